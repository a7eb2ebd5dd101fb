//! Viewer session state and its update function.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Session`]: The complete viewer state
//! - [`Message`]: All user actions
//! - [`update`]: Applies a message and reports an [`Outcome`]
//!
//! Page building goes through a [`PageSource`](crate::source::PageSource);
//! the session never runs programs itself.

mod effects;
mod model;
mod update;

pub use effects::INDEX_QUERY;
pub use model::Session;
pub use update::{Message, Outcome, update};
