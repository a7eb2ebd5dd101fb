use crate::config::Config;
use crate::document::{self, Document, LinkLoc, LinkType, Mark};
use crate::history::{History, ViewState};
use crate::listing::{self, ListingEntry};
use crate::search::{self, SearchResult};
use crate::viewport::Viewport;

use super::update::Outcome;

/// Active search: the needle and its hits on the current page.
#[derive(Debug, Clone, Default)]
pub(super) struct SearchState {
    pub(super) needle: Option<String>,
    pub(super) results: Vec<SearchResult>,
    pub(super) current: Option<usize>,
}

/// The complete viewer state.
///
/// Owns the page being shown, the history that led to it, and everything
/// derived from the page (search hits, selection, focused link). The page is
/// only ever replaced by a fully built one.
#[derive(Debug)]
pub struct Session<S> {
    pub(super) source: S,
    pub(super) config: Config,
    pub(super) document: Document,
    pub(super) history: History,
    pub(super) viewport: Viewport,
    pub(super) focus: Option<LinkLoc>,
    pub(super) query: SearchState,
    pub(super) mark: Mark,
    pub(super) mark_anchor: Option<(usize, usize)>,
    /// Every page on the system, fetched on first use
    pub(super) index: Option<Vec<ListingEntry>>,
    /// Entries of the current listing, in display order
    pub(super) listing: Vec<ListingEntry>,
}

impl<S> Session<S> {
    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn focus(&self) -> Option<LinkLoc> {
        self.focus
    }

    pub const fn mark(&self) -> &Mark {
        &self.mark
    }

    /// Hits of the active search on the current page.
    pub fn results(&self) -> &[SearchResult] {
        &self.query.results
    }

    pub fn search_needle(&self) -> Option<&str> {
        self.query.needle.as_deref()
    }

    /// The selected hit, if any.
    pub fn current_match(&self) -> Option<SearchResult> {
        self.query.current.and_then(|i| self.query.results.get(i).copied())
    }

    /// The index of all pages, if it has been fetched.
    pub fn index(&self) -> Option<&[ListingEntry]> {
        self.index.as_deref()
    }

    /// Origin and focus to remember when leaving the page.
    pub(super) const fn view_state(&self) -> ViewState {
        ViewState {
            top: self.viewport.top(),
            left: self.viewport.left(),
            focus: self.focus,
        }
    }

    /// Replace the page, restoring `view` as far as the new page allows.
    pub(super) fn install(&mut self, document: Document, view: ViewState) {
        self.viewport
            .set_content(document.line_count(), document.max_line_len());
        self.document = document;
        self.viewport.restore(view.top, view.left);
        self.focus = view.focus.filter(|loc| self.document.link(*loc).is_some());
        self.query.results.clear();
        self.query.current = None;
        self.clear_mark();
    }

    // Search

    /// Search the page and select the first hit at or below the top line.
    pub fn search(&mut self, needle: &str) -> Outcome {
        self.query.needle = Some(needle.to_string());
        self.query.results = search::search(
            needle,
            self.document.lines(),
            self.config.case_sensitive,
        );
        if self.query.results.is_empty() {
            self.query.current = None;
            return Outcome::NotFound(format!("Pattern not found: {needle}"));
        }
        let top = self.viewport.top();
        let first = self.query.results.partition_point(|r| r.line < top);
        self.select_match(if first < self.query.results.len() { first } else { 0 });
        Outcome::Updated
    }

    /// Select the first hit on a later line, wrapping to the first hit.
    pub fn next_match(&mut self) -> Outcome {
        if self.query.results.is_empty() {
            return Outcome::NoEffect;
        }
        let next = match self.current_match() {
            Some(hit) => search::search_next(&self.query.results, hit.line).unwrap_or(0),
            None => {
                let top = self.viewport.top();
                let first = self.query.results.partition_point(|r| r.line < top);
                if first < self.query.results.len() { first } else { 0 }
            }
        };
        self.select_match(next);
        Outcome::Updated
    }

    /// Select the last hit on an earlier line, wrapping to the last hit.
    pub fn prev_match(&mut self) -> Outcome {
        let Some(last) = self.query.results.len().checked_sub(1) else {
            return Outcome::NoEffect;
        };
        let from = self
            .current_match()
            .map_or(self.viewport.top(), |hit| hit.line);
        let prev = search::search_prev(&self.query.results, from).unwrap_or(last);
        self.select_match(prev);
        Outcome::Updated
    }

    pub fn clear_search(&mut self) {
        self.query = SearchState::default();
    }

    fn select_match(&mut self, index: usize) {
        let Some(hit) = self.query.results.get(index).copied() else {
            return;
        };
        self.query.current = Some(index);
        if !self.viewport.shows(hit.line) {
            self.viewport.go_to_line(hit.line);
        }
        self.viewport.ensure_columns_visible(hit.start..hit.end);
        tracing::debug!(line = hit.line, index, "selected search hit");
    }

    /// Focus the next listing entry whose identifier matches `needle`,
    /// wrapping around the listing.
    pub fn find_page(&mut self, needle: &str, fullsub: bool) -> Outcome {
        let links = all_links(&self.document);
        if self.listing.len() != links.len() {
            return Outcome::NoEffect;
        }
        let pos = self
            .focus
            .and_then(|focus| links.iter().position(|loc| *loc == focus));
        let found = listing::search(needle, &self.listing, pos, fullsub)
            .or_else(|| listing::search(needle, &self.listing, None, fullsub));
        match found {
            Some(i) => {
                self.focus_link(links[i]);
                Outcome::Updated
            }
            None => Outcome::NotFound(format!("No page matching {needle}")),
        }
    }

    // Links

    /// Focus the next link, or the first on screen when the focus is off
    /// screen.
    pub fn next_link(&mut self) -> Outcome {
        let lines = self.document.lines();
        let window = self.viewport.visible_lines();
        let next = match self.focus {
            Some(focus) if self.viewport.shows(focus.line) => document::next_link(lines, focus),
            _ => document::first_link(lines, window.start, window.end.saturating_sub(1))
                .or_else(|| document::next_link(lines, LinkLoc::new(window.start, usize::MAX))),
        };
        match next {
            Some(loc) => {
                self.focus_link(loc);
                Outcome::Updated
            }
            None => Outcome::NoEffect,
        }
    }

    /// Focus the previous link, or the last on screen when the focus is off
    /// screen.
    pub fn prev_link(&mut self) -> Outcome {
        let lines = self.document.lines();
        let window = self.viewport.visible_lines();
        let prev = match self.focus {
            Some(focus) if self.viewport.shows(focus.line) => document::prev_link(lines, focus),
            _ => document::last_link(lines, window.start, window.end.saturating_sub(1))
                .or_else(|| document::prev_link(lines, LinkLoc::new(window.start, 0))),
        };
        match prev {
            Some(loc) => {
                self.focus_link(loc);
                Outcome::Updated
            }
            None => Outcome::NoEffect,
        }
    }

    pub(super) fn focus_link(&mut self, loc: LinkLoc) {
        self.focus = Some(loc);
        self.viewport.ensure_visible(loc.line);
        if let Some(link) = self.document.link(loc) {
            self.viewport.ensure_columns_visible(link.span());
        }
    }

    /// Jump to the line that defines an option, e.g. `-a` or `--all`.
    pub(super) fn find_definition(&mut self, target: &str) -> Outcome {
        let results = search::search(target, self.document.lines(), true);
        let defining = results.iter().position(|hit| {
            self.document
                .line_at(hit.line)
                .is_some_and(|line| {
                    line.indent() == Some(hit.start) || starts_option_list(line.text(), hit.start)
                })
        });
        match defining {
            Some(i) => {
                self.query.needle = Some(target.to_string());
                self.query.results = results;
                self.select_match(i);
                Outcome::Updated
            }
            None => Outcome::NotFound(format!("No definition of {target}")),
        }
    }

    // Selection

    /// Start an empty selection at a position.
    pub fn start_mark(&mut self, line: usize, col: usize) {
        self.mark_anchor = Some((line, col));
        self.mark = Mark::spanning((line, col), (line, col));
    }

    /// Grow the selection from its anchor to a position.
    pub fn extend_mark(&mut self, line: usize, col: usize) -> Outcome {
        match self.mark_anchor {
            Some(anchor) => {
                self.mark = Mark::spanning(anchor, (line, col));
                Outcome::Updated
            }
            None => Outcome::NoEffect,
        }
    }

    /// Text under the selection.
    pub fn marked_text(&self) -> Option<String> {
        document::get_mark(&self.mark, self.document.lines())
    }

    pub fn clear_mark(&mut self) {
        self.mark = Mark::default();
        self.mark_anchor = None;
    }

    /// The focused link's type and target.
    pub fn focused_link(&self) -> Option<(LinkType, &str)> {
        let link = self.document.link(self.focus?)?;
        Some((link.link_type, link.target.as_str()))
    }
}

/// Whether the option at `col` belongs to a comma-separated definition such
/// as `-a, --all`.
fn starts_option_list(text: &str, col: usize) -> bool {
    let before: String = text.chars().take(col).collect();
    let Some(list) = before.trim().strip_suffix(',') else {
        return false;
    };
    list.split(',').map(str::trim).all(|token| token.starts_with('-'))
}

/// Every link location of a document, in order.
pub(super) fn all_links(document: &Document) -> Vec<LinkLoc> {
    document
        .lines()
        .iter()
        .enumerate()
        .flat_map(|(i, line)| (0..line.links().len()).map(move |j| LinkLoc::new(i, j)))
        .collect()
}
