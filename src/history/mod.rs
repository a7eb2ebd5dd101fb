//! Browsing history.
//!
//! A branch-and-truncate list of requests: going back and then opening a new
//! page discards every entry that was ahead of the current one. Each entry
//! remembers the view it was left with so returning to it restores the
//! scroll position and focused link.

use std::fmt;

use serde::Serialize;

use crate::document::LinkLoc;

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Listing of every page on the system
    Index,
    /// Manual page by name, e.g. `ls` or `1 ls`
    Man,
    /// Manual page from a file path
    LocalFile,
    Apropos,
    Whatis,
}

impl RequestKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Index => "INDEX",
            Self::Man => "MAN",
            Self::LocalFile => "LOCAL",
            Self::Apropos => "APROPOS",
            Self::Whatis => "WHATIS",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Viewport origin and focused link saved with a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub top: usize,
    pub left: usize,
    pub focus: Option<LinkLoc>,
}

/// One visited page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub kind: RequestKind,
    pub args: String,
    pub view: ViewState,
}

impl Request {
    pub fn new(kind: RequestKind, args: impl Into<String>) -> Self {
        Self {
            kind,
            args: args.into(),
            view: ViewState::default(),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.args)
        }
    }
}

/// Visited requests and the position of the current one.
///
/// Entries past the current one stay reachable by `forward` and `jump`
/// until the next `push` or `reset`. The last entry is always the top.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Request>,
    current: usize,
}

impl History {
    /// History holding a single initial request.
    pub fn new(kind: RequestKind, args: impl Into<String>) -> Self {
        Self {
            entries: vec![Request::new(kind, args)],
            current: 0,
        }
    }

    pub fn current(&self) -> &Request {
        &self.entries[self.current]
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Index of the last reachable entry.
    pub const fn top(&self) -> usize {
        self.entries.len() - 1
    }

    /// All reachable entries, oldest first.
    pub fn entries(&self) -> &[Request] {
        &self.entries
    }

    /// Overwrite the current request, keeping its saved view.
    pub fn replace(&mut self, kind: RequestKind, args: impl Into<String>) {
        let entry = &mut self.entries[self.current];
        entry.kind = kind;
        entry.args = args.into();
    }

    /// Record the view the current entry is being left with.
    pub fn save_view(&mut self, view: ViewState) {
        self.entries[self.current].view = view;
    }

    /// Open a new request after the current one, discarding any forward
    /// entries.
    pub fn push(
        &mut self,
        kind: RequestKind,
        args: impl Into<String>,
        view: ViewState,
    ) -> &Request {
        self.save_view(view);
        let discarded = self.entries.len() - self.current - 1;
        self.entries.truncate(self.current + 1);
        self.entries.push(Request::new(kind, args));
        self.current += 1;
        tracing::debug!(
            current = self.current,
            discarded,
            request = %self.entries[self.current],
            "history push"
        );
        &self.entries[self.current]
    }

    /// Move to entry `pos` if it is reachable.
    pub fn jump(&mut self, pos: usize, view: ViewState) -> Option<&Request> {
        if pos > self.top() {
            return None;
        }
        self.save_view(view);
        self.current = pos;
        tracing::debug!(current = pos, top = self.top(), "history jump");
        Some(&self.entries[pos])
    }

    pub fn back(&mut self, n: usize, view: ViewState) -> Option<&Request> {
        let pos = self.current.checked_sub(n)?;
        self.jump(pos, view)
    }

    pub fn forward(&mut self, n: usize, view: ViewState) -> Option<&Request> {
        let pos = self.current.checked_add(n)?;
        self.jump(pos, view)
    }

    /// Forget every entry after the current one.
    pub fn reset(&mut self) {
        self.entries.truncate(self.current + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(top: usize) -> ViewState {
        ViewState {
            top,
            left: 0,
            focus: None,
        }
    }

    #[test]
    fn test_branch_and_truncate_scenario() {
        let mut history = History::new(RequestKind::Index, "");
        assert_eq!((history.current_index(), history.top()), (0, 0));

        history.push(RequestKind::Man, "ls(1)", view(0));
        assert_eq!((history.current_index(), history.top()), (1, 1));
        history.push(RequestKind::Man, "cat(1)", view(0));
        assert_eq!((history.current_index(), history.top()), (2, 2));

        assert!(history.back(2, view(0)).is_some());
        assert_eq!(history.current_index(), 0);

        history.push(RequestKind::Whatis, "foo", view(0));
        assert_eq!((history.current_index(), history.top()), (1, 1));
        assert_eq!(history.current().kind, RequestKind::Whatis);
        assert!(history.entries().iter().all(|r| r.kind != RequestKind::Man));
    }

    #[test]
    fn test_failed_moves_change_nothing() {
        let mut history = History::new(RequestKind::Index, "");
        history.push(RequestKind::Man, "ls", view(3));
        history.save_view(view(9));

        assert!(history.back(2, view(1)).is_none());
        assert!(history.forward(1, view(1)).is_none());
        assert!(history.jump(5, view(1)).is_none());
        assert_eq!(history.current_index(), 1);
        assert_eq!(history.current().view, view(9));
    }

    #[test]
    fn test_moves_save_and_restore_views() {
        let mut history = History::new(RequestKind::Index, "");
        history.push(RequestKind::Man, "ls", view(40));
        let back = history.back(1, view(12)).cloned();
        assert_eq!(back.map(|r| r.view), Some(view(40)));
        let forward = history.forward(1, view(41)).cloned();
        assert_eq!(forward.map(|r| r.view), Some(view(12)));
    }

    #[test]
    fn test_push_starts_with_default_view() {
        let mut history = History::new(RequestKind::Index, "");
        let pushed = history.push(RequestKind::Apropos, "ls", view(7));
        assert_eq!(pushed.view, ViewState::default());
        assert_eq!(history.entries()[0].view, view(7));
    }

    #[test]
    fn test_replace_keeps_view() {
        let mut history = History::new(RequestKind::Man, "ls");
        history.save_view(view(5));
        history.replace(RequestKind::Man, "1 ls");
        assert_eq!(history.current().args, "1 ls");
        assert_eq!(history.current().view, view(5));
    }

    #[test]
    fn test_reset_discards_forward_entries() {
        let mut history = History::new(RequestKind::Index, "");
        history.push(RequestKind::Man, "a", view(0));
        history.push(RequestKind::Man, "b", view(0));
        history.back(1, view(0));
        history.reset();
        assert_eq!((history.current_index(), history.top()), (1, 1));
        assert!(history.forward(1, view(0)).is_none());
    }

    #[test]
    fn test_jump_to_forward_entry() {
        let mut history = History::new(RequestKind::Index, "");
        history.push(RequestKind::Man, "a", view(0));
        history.push(RequestKind::Man, "b", view(0));
        history.jump(0, view(0));
        assert_eq!(history.jump(2, view(0)).map(|r| r.args.as_str()), Some("b"));
    }

    #[test]
    fn test_request_display() {
        assert_eq!(Request::new(RequestKind::Index, "").to_string(), "INDEX");
        assert_eq!(Request::new(RequestKind::LocalFile, "./ls.1").to_string(), "LOCAL ./ls.1");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Push,
            Back(usize),
            Forward(usize),
            Jump(usize),
            Reset,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Push),
                (0usize..4).prop_map(Op::Back),
                (0usize..4).prop_map(Op::Forward),
                (0usize..8).prop_map(Op::Jump),
                Just(Op::Reset),
            ]
        }

        proptest! {
            #[test]
            fn current_stays_within_bounds(ops in prop::collection::vec(op(), 0..40)) {
                let mut history = History::new(RequestKind::Index, "");
                for (i, op) in ops.into_iter().enumerate() {
                    let v = view(i);
                    match op {
                        Op::Push => {
                            let before = history.current_index();
                            history.push(RequestKind::Man, format!("p{i}"), v);
                            prop_assert_eq!(history.current_index(), before + 1);
                            prop_assert_eq!(history.top(), before + 1);
                        }
                        Op::Back(n) => { history.back(n, v); }
                        Op::Forward(n) => { history.forward(n, v); }
                        Op::Jump(p) => { history.jump(p, v); }
                        Op::Reset => history.reset(),
                    }
                    prop_assert!(history.current_index() <= history.top());
                }
            }

            #[test]
            fn back_then_forward_restores_position_and_view(
                pushes in 1usize..8,
                n in 1usize..8,
                top in 0usize..100,
            ) {
                let mut history = History::new(RequestKind::Index, "");
                for i in 0..pushes {
                    history.push(RequestKind::Man, format!("p{i}"), view(i));
                }
                let start = history.current_index();
                if history.back(n, view(top)).is_some() {
                    let restored = history.forward(n, view(0)).cloned();
                    prop_assert_eq!(history.current_index(), start);
                    prop_assert_eq!(restored.map(|r| r.view), Some(view(top)));
                }
            }
        }
    }
}
