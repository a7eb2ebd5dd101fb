//! Text selection spanning one or more lines.

use serde::Serialize;

use super::types::Line;

/// A selection from `(start_line, start_char)` up to, not including,
/// `(end_line, end_char)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Mark {
    pub enabled: bool,
    pub start_line: usize,
    pub start_char: usize,
    pub end_line: usize,
    pub end_char: usize,
}

impl Mark {
    /// An enabled mark between two positions given in order.
    pub const fn new(
        start_line: usize,
        start_char: usize,
        end_line: usize,
        end_char: usize,
    ) -> Self {
        Self {
            enabled: true,
            start_line,
            start_char,
            end_line,
            end_char,
        }
    }

    /// An enabled mark between an anchor and a cursor in either order.
    pub fn spanning(anchor: (usize, usize), cursor: (usize, usize)) -> Self {
        let (start, end) = if anchor <= cursor {
            (anchor, cursor)
        } else {
            (cursor, anchor)
        };
        Self::new(start.0, start.1, end.0, end.1)
    }

    /// Enabled and not inverted.
    pub fn is_valid(&self) -> bool {
        self.enabled && (self.start_line, self.start_char) <= (self.end_line, self.end_char)
    }

    /// Whether the character at `(line, col)` is selected.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        self.is_valid()
            && (self.start_line, self.start_char) <= (line, col)
            && (line, col) < (self.end_line, self.end_char)
    }
}

/// Text covered by `mark`, lines joined by `\n`.
///
/// Returns `None` for a disabled or inverted mark, or one that points past
/// the document or past the end of its lines.
pub fn get_mark(mark: &Mark, lines: &[Line]) -> Option<String> {
    if !mark.is_valid() {
        return None;
    }
    let first = lines.get(mark.start_line)?;
    let last = lines.get(mark.end_line)?;
    if mark.start_char > first.len() || mark.end_char > last.len() {
        return None;
    }

    if mark.start_line == mark.end_line {
        return Some(first.slice(mark.start_char..mark.end_char));
    }

    let mut out = first.slice(mark.start_char..first.len());
    for line in &lines[mark.start_line + 1..mark.end_line] {
        out.push('\n');
        out.push_str(line.text());
    }
    out.push('\n');
    out.push_str(&last.slice(0..mark.end_char));
    Some(out)
}
