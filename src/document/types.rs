//! Core document types.

use std::ops::Range;

use serde::Serialize;

/// Style of a single visible character.
///
/// Each position carries exactly one style, so the regular/bold/italic/
/// underline tracks of a line always partition it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    Underline,
}

/// What a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Manual page reference, e.g. `ls(1)`
    Man,
    /// http(s) URL
    Http,
    /// Email address
    Email,
    /// File in the local filesystem
    File,
    /// Text to find in the current document
    LocalSearch,
}

/// A link embedded in a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Character where the link starts
    pub start: usize,
    /// Character where the link ends (exclusive)
    pub end: usize,
    pub link_type: LinkType,
    /// Link target, e.g. `ls(1)` or `https://www.gnu.org/`
    pub target: String,
    /// Portion of the next line the link continues into after a hard wrap
    pub next: Option<Range<usize>>,
}

impl Link {
    pub fn new(start: usize, end: usize, link_type: LinkType, target: impl Into<String>) -> Self {
        Self {
            start,
            end,
            link_type,
            target: target.into(),
            next: None,
        }
    }

    /// Attach a continuation on the following line.
    #[must_use]
    pub const fn continued(mut self, next: Range<usize>) -> Self {
        self.next = Some(next);
        self
    }

    /// Whether the link gets hyphenated into the next line.
    pub const fn in_next(&self) -> bool {
        self.next.is_some()
    }

    /// Character range on the link's own line.
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A decoded line of text with per-character styles and links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Line {
    text: String,
    styles: Vec<CharStyle>,
    links: Vec<Link>,
}

impl Line {
    /// Create a line from text and one style per character.
    pub fn new(text: String, styles: Vec<CharStyle>) -> Self {
        debug_assert_eq!(text.chars().count(), styles.len());
        Self {
            text,
            styles,
            links: Vec::new(),
        }
    }

    /// Create a line where every character has the same style.
    pub fn styled(text: impl Into<String>, style: CharStyle) -> Self {
        let text = text.into();
        let styles = vec![style; text.chars().count()];
        Self::new(text, styles)
    }

    /// Create an unstyled line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, CharStyle::Regular)
    }

    /// Number of visible characters.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn styles(&self) -> &[CharStyle] {
        &self.styles
    }

    pub fn style_at(&self, pos: usize) -> Option<CharStyle> {
        self.styles.get(pos).copied()
    }

    pub fn is_regular(&self, pos: usize) -> bool {
        self.style_at(pos) == Some(CharStyle::Regular)
    }

    pub fn is_bold(&self, pos: usize) -> bool {
        self.style_at(pos) == Some(CharStyle::Bold)
    }

    pub fn is_italic(&self, pos: usize) -> bool {
        self.style_at(pos) == Some(CharStyle::Italic)
    }

    pub fn is_underline(&self, pos: usize) -> bool {
        self.style_at(pos) == Some(CharStyle::Underline)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn set_links(&mut self, links: Vec<Link>) {
        debug_assert!(links.iter().all(|l| l.start <= l.end && l.end <= self.len()));
        self.links = links;
    }

    /// Text of a character range, clamped to the line.
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.text.chars().skip(start).take(end - start).collect()
    }

    /// Length of the line without trailing whitespace.
    pub fn trimmed_len(&self) -> usize {
        self.text.trim_end().chars().count()
    }

    /// Index of the first non-whitespace character, if any.
    pub fn indent(&self) -> Option<usize> {
        self.text.chars().position(|c| !c.is_whitespace())
    }
}

/// Incrementally builds a [`Line`] out of styled segments.
#[derive(Debug, Default)]
pub struct LineBuilder {
    text: String,
    styles: Vec<CharStyle>,
    links: Vec<Link>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length in characters.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn push(&mut self, text: &str, style: CharStyle) -> &mut Self {
        for ch in text.chars() {
            self.text.push(ch);
            self.styles.push(style);
        }
        self
    }

    /// Append `text` and link it to `target`.
    pub fn push_link(
        &mut self,
        text: &str,
        style: CharStyle,
        link_type: LinkType,
        target: &str,
    ) -> &mut Self {
        let start = self.len();
        self.push(text, style);
        self.links.push(Link::new(start, self.len(), link_type, target));
        self
    }

    /// Pad with spaces up to column `col`.
    pub fn pad_to(&mut self, col: usize) -> &mut Self {
        while self.len() < col {
            self.text.push(' ');
            self.styles.push(CharStyle::Regular);
        }
        self
    }

    pub fn finish(self) -> Line {
        let mut line = Line::new(self.text, self.styles);
        line.set_links(self.links);
        line
    }
}

/// Location of a link: line number and index within that line.
///
/// Ordered by line first, then by link index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LinkLoc {
    pub line: usize,
    pub link: usize,
}

impl LinkLoc {
    pub const fn new(line: usize, link: usize) -> Self {
        Self { line, link }
    }
}

/// Kind of a table of contents entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TocKind {
    Heading,
    Subheading,
    TaggedParagraph,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub kind: TocKind,
    pub text: String,
}

impl TocEntry {
    pub fn new(kind: TocKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Which family of page a document belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Formatter output for a single manual page
    ManualPage,
    /// An apropos, whatis or index listing, grouped by these sections
    Listing { sections: Vec<String> },
}

/// A decoded, linked and titled page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    title: String,
    kind: DocumentKind,
    lines: Vec<Line>,
    /// Message for a page that produced no content
    error: Option<String>,
    /// Table of contents, populated on first request
    #[serde(skip_serializing_if = "Option::is_none")]
    toc: Option<Vec<TocEntry>>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            kind: DocumentKind::ManualPage,
            lines: Vec::new(),
            error: None,
            toc: None,
        }
    }

    pub fn new(title: impl Into<String>, kind: DocumentKind, lines: Vec<Line>) -> Self {
        Self {
            title: title.into(),
            kind,
            lines,
            error: None,
            toc: None,
        }
    }

    /// A document with no lines that records why.
    pub fn not_found(
        title: impl Into<String>,
        kind: DocumentKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(title, kind, Vec::new())
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    /// Sections of a listing document; empty for manual pages.
    pub fn sections(&self) -> &[String] {
        match &self.kind {
            DocumentKind::Listing { sections } => sections,
            DocumentKind::ManualPage => &[],
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_at(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of the longest line, in characters.
    pub fn max_line_len(&self) -> usize {
        self.lines.iter().map(Line::len).max().unwrap_or(0)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Total number of links across all lines.
    pub fn link_count(&self) -> usize {
        self.lines.iter().map(|l| l.links().len()).sum()
    }

    /// The link at a location, if it exists.
    pub fn link(&self, loc: LinkLoc) -> Option<&Link> {
        self.lines.get(loc.line)?.links().get(loc.link)
    }

    /// Cached table of contents, if it has been built.
    pub fn cached_toc(&self) -> Option<&[TocEntry]> {
        self.toc.as_deref()
    }

    pub fn set_toc(&mut self, toc: Vec<TocEntry>) -> &[TocEntry] {
        self.toc.insert(toc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
