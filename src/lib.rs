// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. listing::ListingEntry)
    clippy::module_name_repetitions
)]

//! # Manless
//!
//! The document engine of a hypertext manual page viewer.
//!
//! Manless turns formatter output and apropos/whatis listings into
//! navigable documents with:
//! - Bold, italic and underline decoded from overstrike and SGR emphasis
//! - Links to other manual pages, URLs, email addresses, files and options
//! - A table of contents built from the page structure
//! - Back/forward history that remembers where each page was left
//! - Incremental search and text selection
//!
//! ## Architecture
//!
//! Manless uses The Elm Architecture (TEA) pattern:
//! - **Session**: Viewer state
//! - **Message**: User actions
//! - **Update**: State transitions reporting an outcome
//!
//! Rendering is left to the caller, which reads the session's document and
//! viewport. Page text comes from a [`source::PageSource`].
//!
//! ## Modules
//!
//! - [`app`]: Session state and the update function
//! - [`document`]: Decoding, link detection and document assembly
//! - [`listing`]: apropos/whatis output parsing
//! - [`history`]: Visited requests
//! - [`search`]: Text search
//! - [`viewport`]: Scroll position
//! - [`config`]: rc files and command-line flags
//! - [`source`]: The boundary to man, apropos and whatis

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod listing;
pub mod search;
pub mod source;
pub mod viewport;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Message, Outcome, Session, update};
    pub use crate::document::Document;
    pub use crate::history::RequestKind;
    pub use crate::source::PageSource;
    pub use crate::viewport::Viewport;
}
