//! Page building: the only place the session talks to its [`PageSource`].

use crate::config::Config;
use crate::document::{
    self, Document, DocumentKind, LinkOptions, LinkType, ListingHeader, TocEntry, toc,
};
use crate::error::{Error, Result};
use crate::history::{History, Request, RequestKind, ViewState};
use crate::listing::{self, ListingCommand, ListingEntry};
use crate::source::PageSource;
use crate::viewport::Viewport;

use super::model::{SearchState, Session};
use super::update::Outcome;

/// apropos query that matches every page.
pub const INDEX_QUERY: &str = ".";

const VERSION: &str = concat!("manless ", env!("CARGO_PKG_VERSION"));

/// Split a soft "no content" error from fatal ones.
fn soft<T>(result: Result<T>) -> Result<std::result::Result<T, String>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(Error::NotFound(message)) => Ok(Err(message)),
        Err(e) => Err(e),
    }
}

fn parse(cmd: ListingCommand, text: &str) -> Result<Vec<ListingEntry>> {
    listing::parse_listing(cmd, text)
        .inspect_err(|e| tracing::warn!(error = %e, "rejected listing output"))
}

impl<S: PageSource> Session<S> {
    /// Start a session on an initial request.
    ///
    /// A request without content still yields a session; its page carries
    /// the error message.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures while building the first page.
    pub fn new(
        source: S,
        config: Config,
        kind: RequestKind,
        args: &str,
        size: (u16, u16),
    ) -> Result<Self> {
        let mut session = Self {
            source,
            config,
            document: Document::empty(),
            history: History::new(kind, args),
            viewport: Viewport::new(size.0, size.1),
            focus: None,
            query: SearchState::default(),
            mark: document::Mark::default(),
            mark_anchor: None,
            index: None,
            listing: Vec::new(),
        };
        session.populate_page()?;
        Ok(session)
    }

    /// Columns the formatter lays pages out for.
    fn format_width(&self) -> u16 {
        self.config.width.unwrap_or_else(|| self.viewport.width())
    }

    /// Rebuild the current request in place, keeping the view.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures; the current page is kept.
    pub fn populate_page(&mut self) -> Result<Outcome> {
        let request = self.history.current().clone();
        let view = self.view_state();
        let (document, entries) = self.build(&request)?;
        self.listing = entries;
        self.install(document, view);
        Ok(Outcome::Updated)
    }

    /// Open a new request. The page is built before history changes, so a
    /// request without content leaves everything as it was.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures.
    pub fn open(&mut self, kind: RequestKind, args: &str) -> Result<Outcome> {
        let (document, entries) = self.build(&Request::new(kind, args))?;
        if let Some(message) = document.error() {
            return Ok(Outcome::NotFound(message.to_string()));
        }
        let view = self.view_state();
        self.history.push(kind, args, view);
        self.listing = entries;
        self.install(document, ViewState::default());
        Ok(Outcome::Updated)
    }

    /// Go back `n` entries.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures.
    pub fn back(&mut self, n: usize) -> Result<Outcome> {
        match self.history.current_index().checked_sub(n) {
            Some(pos) => self.jump(pos),
            None => Ok(Outcome::NoEffect),
        }
    }

    /// Go forward `n` entries.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures.
    pub fn forward(&mut self, n: usize) -> Result<Outcome> {
        match self.history.current_index().checked_add(n) {
            Some(pos) => self.jump(pos),
            None => Ok(Outcome::NoEffect),
        }
    }

    /// Go to history entry `pos`, restoring the view it was left with.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures; history is not moved.
    pub fn jump(&mut self, pos: usize) -> Result<Outcome> {
        let Some(request) = self.history.entries().get(pos).cloned() else {
            return Ok(Outcome::NoEffect);
        };
        let (document, entries) = self.build(&request)?;
        let view = self.view_state();
        let Some(target) = self.history.jump(pos, view) else {
            return Ok(Outcome::NoEffect);
        };
        let saved = target.view;
        self.listing = entries;
        self.install(document, saved);
        Ok(Outcome::Updated)
    }

    /// Resize the display, reformatting when the page follows its width.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures while reformatting.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<Outcome> {
        let reformat = self.config.width.is_none() && width != self.viewport.width();
        self.viewport.resize(width, height);
        if reformat {
            self.populate_page()
        } else {
            Ok(Outcome::Updated)
        }
    }

    /// Build the table of contents on first use.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures.
    pub fn toc(&mut self) -> Result<&[TocEntry]> {
        if self.document.cached_toc().is_none() {
            let entries = self.toc_entries()?;
            tracing::debug!(entries = entries.len(), "built table of contents");
            self.document.set_toc(entries);
        }
        Ok(self.document.cached_toc().unwrap_or_default())
    }

    fn toc_entries(&self) -> Result<Vec<TocEntry>> {
        if self.document.is_error() {
            return Ok(Vec::new());
        }
        let request = self.history.current();
        match (self.document.kind(), request.kind) {
            (DocumentKind::Listing { sections }, _) => Ok(toc::from_sections(sections)),
            (DocumentKind::ManualPage, kind) => {
                let local = kind == RequestKind::LocalFile;
                let markers = soft(self.source.toc_markers(&request.args, local))?;
                Ok(toc::from_markers(markers.unwrap_or_default(), self.config.tagged_toc))
            }
        }
    }

    /// Scroll to the line a table of contents entry points to.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures while building the table.
    pub fn go_to_toc_entry(&mut self, index: usize) -> Result<Outcome> {
        let Some(entry) = self.toc()?.get(index).cloned() else {
            return Ok(Outcome::NoEffect);
        };
        match toc::entry_line(&entry, self.document.lines()) {
            Some(line) => {
                self.viewport.go_to_line(line);
                Ok(Outcome::Updated)
            }
            None => Ok(Outcome::NotFound(format!("{} is not on this page", entry.text))),
        }
    }

    /// Open manual page links, search for option links, and hand every other
    /// link type back to the caller.
    ///
    /// # Errors
    ///
    /// Fatal collaborator failures while opening a page.
    pub fn follow_link(&mut self) -> Result<Outcome> {
        let Some(link) = self.focus.and_then(|loc| self.document.link(loc)).cloned() else {
            return Ok(Outcome::NoEffect);
        };
        match link.link_type {
            LinkType::Man => self.open(RequestKind::Man, &link.target),
            LinkType::LocalSearch => Ok(self.find_definition(&link.target)),
            LinkType::Http | LinkType::Email | LinkType::File => Ok(Outcome::External(link)),
        }
    }

    /// Fetch the index of all pages once; an empty index is kept as empty.
    fn load_index(&mut self) -> Result<()> {
        if self.index.is_some() {
            return Ok(());
        }
        let entries = match soft(self.source.aprowhat(ListingCommand::Apropos, INDEX_QUERY))? {
            Ok(text) => parse(ListingCommand::Apropos, &text)?,
            Err(message) => {
                tracing::debug!(reason = %message, "no index available");
                Vec::new()
            }
        };
        tracing::debug!(entries = entries.len(), "loaded index");
        self.index = Some(entries);
        Ok(())
    }

    /// Build the page for a request along with its listing entries in
    /// display order (empty for manual pages).
    fn build(&mut self, request: &Request) -> Result<(Document, Vec<ListingEntry>)> {
        tracing::debug!(request = %request, "building page");
        match request.kind {
            RequestKind::Man | RequestKind::LocalFile => {
                let local = request.kind == RequestKind::LocalFile;
                let width = self.format_width();
                let raw = match soft(self.source.man(&request.args, local, width))? {
                    Ok(raw) => raw,
                    Err(message) => {
                        let kind = DocumentKind::ManualPage;
                        let doc = Document::not_found(request.args.as_str(), kind, message);
                        return Ok((doc, Vec::new()));
                    }
                };
                if self.config.verify_links {
                    self.load_index()?;
                }
                let opts = LinkOptions {
                    known_pages: self.index.as_deref().filter(|index| !index.is_empty()),
                    local_search: self.config.local_search,
                };
                Ok((document::man_page(&raw, &request.args, &opts), Vec::new()))
            }
            RequestKind::Apropos | RequestKind::Whatis => {
                let cmd = if request.kind == RequestKind::Apropos {
                    ListingCommand::Apropos
                } else {
                    ListingCommand::Whatis
                };
                let header = self.listing_header(
                    request.kind.label().to_string(),
                    format!("{} {}", cmd.name(), request.args),
                );
                let entries = match soft(self.source.aprowhat(cmd, &request.args))? {
                    Ok(text) => parse(cmd, &text)?,
                    Err(message) => {
                        let kind = DocumentKind::Listing { sections: Vec::new() };
                        return Ok((Document::not_found(header.title, kind, message), Vec::new()));
                    }
                };
                Ok(self.listing_document(&entries, &header))
            }
            RequestKind::Index => {
                self.load_index()?;
                let header = self.listing_header(
                    request.kind.label().to_string(),
                    "All Manual Pages".to_string(),
                );
                let entries = self.index.clone().unwrap_or_default();
                Ok(self.listing_document(&entries, &header))
            }
        }
    }

    fn listing_header(&self, key: String, title: String) -> ListingHeader {
        ListingHeader {
            key,
            title,
            version: VERSION.to_string(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    fn listing_document(
        &self,
        entries: &[ListingEntry],
        header: &ListingHeader,
    ) -> (Document, Vec<ListingEntry>) {
        let sections = listing::sections(entries);
        let document =
            document::listing_page(entries, &sections, header, usize::from(self.format_width()));
        let ordered = sections
            .iter()
            .flat_map(|s| entries.iter().filter(move |e| e.section == *s))
            .cloned()
            .collect();
        (document, ordered)
    }
}
