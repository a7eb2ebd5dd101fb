//! The boundary to the programs that produce page text.
//!
//! A [`PageSource`] runs (or pretends to run) `man`, `apropos` and `whatis`
//! and hands back their output. Returning [`Error::NotFound`] means the
//! request has no content; any other error is fatal for the action.

use crate::document::{TocEntry, toc};
use crate::error::{Error, Result};
use crate::listing::ListingCommand;

/// Text-producing and structural-marker collaborator.
pub trait PageSource {
    /// Formatter output for a manual page, laid out for `width` columns.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when there is no such page.
    fn man(&self, args: &str, local_file: bool, width: u16) -> Result<String>;

    /// Raw output of apropos or whatis.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when nothing matches.
    fn aprowhat(&self, cmd: ListingCommand, args: &str) -> Result<String>;

    /// Headings, subheadings and tagged paragraphs of a manual page.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when there is no such page.
    fn toc_markers(&self, args: &str, local_file: bool) -> Result<Vec<TocEntry>>;
}

/// A source backed by text already in memory.
///
/// Every manual page request yields the same formatted page; listing
/// requests yield the stored listing. Useful for piping preformatted pages
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    page: Option<String>,
    roff: Option<String>,
    listing: Option<String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatted page text.
    #[must_use]
    pub fn with_page(mut self, text: impl Into<String>) -> Self {
        self.page = Some(text.into());
        self
    }

    /// Roff source of the page, used for its table of contents.
    #[must_use]
    pub fn with_roff(mut self, source: impl Into<String>) -> Self {
        self.roff = Some(source.into());
        self
    }

    /// apropos/whatis output.
    #[must_use]
    pub fn with_listing(mut self, text: impl Into<String>) -> Self {
        self.listing = Some(text.into());
        self
    }
}

impl PageSource for StaticSource {
    fn man(&self, args: &str, _local_file: bool, _width: u16) -> Result<String> {
        self.page
            .clone()
            .ok_or_else(|| Error::NotFound(format!("No manual entry for {args}")))
    }

    fn aprowhat(&self, cmd: ListingCommand, args: &str) -> Result<String> {
        self.listing
            .clone()
            .ok_or_else(|| Error::NotFound(format!("{args}: nothing appropriate ({})", cmd.name())))
    }

    fn toc_markers(&self, _args: &str, _local_file: bool) -> Result<Vec<TocEntry>> {
        Ok(self
            .roff
            .as_deref()
            .map(toc::markers_from_roff)
            .unwrap_or_default())
    }
}
