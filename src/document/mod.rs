//! Manual page and listing documents.
//!
//! This module handles:
//! - Decoding formatter emphasis into per-character styles
//! - Detecting manual page, URL, email, file and option links
//! - Assembling manual page and listing documents
//! - Table of contents, link traversal and text selection

pub mod assembler;
pub mod decoder;
pub mod links;
pub mod mark;
pub mod navigator;
pub mod toc;
mod types;

pub use assembler::{ListingHeader, listing_page, man_page};
pub use links::{LinkOptions, detect_links};
pub use mark::{Mark, get_mark};
pub use navigator::{first_link, last_link, link_at, next_link, prev_link};
pub use types::{
    CharStyle, Document, DocumentKind, Line, LineBuilder, Link, LinkLoc, LinkType, TocEntry,
    TocKind,
};
