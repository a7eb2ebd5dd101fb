use crate::app::Session;
use crate::document::Link;
use crate::error::Result;
use crate::history::RequestKind;
use crate::source::PageSource;

/// All user actions the session understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Scrolling
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll left by n columns
    ScrollLeft(usize),
    /// Scroll right by n columns
    ScrollRight(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,
    /// Put a line at the top of the screen
    GoToLine(usize),
    /// The display area changed size
    Resize(u16, u16),

    // Requests and history
    /// Open a new request
    Open(RequestKind, String),
    /// Go back n entries
    Back(usize),
    /// Go forward n entries
    Forward(usize),
    /// Go to a history entry by index
    Jump(usize),
    /// Rebuild the current page
    Reload,

    // Search
    /// Search the page for text
    Search(String),
    NextMatch,
    PrevMatch,
    ClearSearch,
    /// Find a page in a listing by prefix (`false`) or substring (`true`)
    FindPage(String, bool),

    // Links
    NextLink,
    PrevLink,
    /// Follow the focused link
    FollowLink,
    /// Focus and follow the link at a line and column
    ClickLink(usize, usize),

    // Table of contents
    /// Scroll to a table of contents entry
    TocSelect(usize),

    // Selection
    /// Anchor a selection at a line and column
    StartMark(usize, usize),
    /// Move the selection's free end
    ExtendMark(usize, usize),
    ClearMark,
}

/// What an action did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed
    Updated,
    /// Nothing to do, e.g. no further link or history entry
    NoEffect,
    /// The request or search produced nothing; the page is unchanged
    NotFound(String),
    /// A link the session does not open itself
    External(Link),
}

/// Apply a message to the session.
///
/// # Errors
///
/// Fatal collaborator failures while building a page. Soft failures come
/// back as [`Outcome::NotFound`] or [`Outcome::NoEffect`].
pub fn update<S: PageSource>(session: &mut Session<S>, msg: Message) -> Result<Outcome> {
    tracing::trace!(?msg, "update");
    let outcome = match msg {
        // Scrolling
        Message::ScrollUp(n) => {
            session.viewport.scroll_up(n);
            Outcome::Updated
        }
        Message::ScrollDown(n) => {
            session.viewport.scroll_down(n);
            Outcome::Updated
        }
        Message::ScrollLeft(n) => {
            session.viewport.scroll_left(n);
            Outcome::Updated
        }
        Message::ScrollRight(n) => {
            session.viewport.scroll_right(n);
            Outcome::Updated
        }
        Message::PageUp => {
            session.viewport.page_up();
            Outcome::Updated
        }
        Message::PageDown => {
            session.viewport.page_down();
            Outcome::Updated
        }
        Message::HalfPageUp => {
            session.viewport.half_page_up();
            Outcome::Updated
        }
        Message::HalfPageDown => {
            session.viewport.half_page_down();
            Outcome::Updated
        }
        Message::GoToTop => {
            session.viewport.go_to_top();
            Outcome::Updated
        }
        Message::GoToBottom => {
            session.viewport.go_to_bottom();
            Outcome::Updated
        }
        Message::GoToLine(line) => {
            session.viewport.go_to_line(line);
            Outcome::Updated
        }
        Message::Resize(width, height) => session.resize(width, height)?,

        // Requests and history
        Message::Open(kind, args) => session.open(kind, &args)?,
        Message::Back(n) => session.back(n)?,
        Message::Forward(n) => session.forward(n)?,
        Message::Jump(pos) => session.jump(pos)?,
        Message::Reload => session.populate_page()?,

        // Search
        Message::Search(needle) => session.search(&needle),
        Message::NextMatch => session.next_match(),
        Message::PrevMatch => session.prev_match(),
        Message::ClearSearch => {
            session.clear_search();
            Outcome::Updated
        }
        Message::FindPage(needle, fullsub) => session.find_page(&needle, fullsub),

        // Links
        Message::NextLink => session.next_link(),
        Message::PrevLink => session.prev_link(),
        Message::FollowLink => session.follow_link()?,
        Message::ClickLink(line, col) => {
            match crate::document::link_at(session.document.lines(), line, col) {
                Some(loc) => {
                    session.focus = Some(loc);
                    session.follow_link()?
                }
                None => Outcome::NoEffect,
            }
        }

        // Table of contents
        Message::TocSelect(index) => session.go_to_toc_entry(index)?,

        // Selection
        Message::StartMark(line, col) => {
            session.start_mark(line, col);
            Outcome::Updated
        }
        Message::ExtendMark(line, col) => session.extend_mark(line, col),
        Message::ClearMark => {
            session.clear_mark();
            Outcome::Updated
        }
    };
    Ok(outcome)
}

