//! Visible window onto a document.
//!
//! The [`Viewport`] tracks the top line and left column shown to the user
//! and clamps every scroll so the window never runs past the content.

use std::ops::Range;

/// The visible portion of a document.
///
/// # Example
///
/// ```
/// use manless::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24);
/// vp.set_content(100, 120);
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_lines(), 10..34);
///
/// vp.scroll_right(100);
/// assert_eq!(vp.left(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    top: usize,
    left: usize,
    total_lines: usize,
    max_width: usize,
}

impl Viewport {
    /// An empty viewport of the given size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            top: 0,
            left: 0,
            total_lines: 0,
            max_width: 0,
        }
    }

    pub const fn top(&self) -> usize {
        self.top
    }

    pub const fn left(&self) -> usize {
        self.left
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the document.
    pub fn visible_lines(&self) -> Range<usize> {
        let end = (self.top + self.height as usize).min(self.total_lines);
        self.top.min(end)..end
    }

    /// Whether `line` is on screen.
    pub fn shows(&self, line: usize) -> bool {
        self.visible_lines().contains(&line)
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.top = self.top.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.top = self.top.saturating_add(n).min(self.max_top());
    }

    pub const fn scroll_left(&mut self, n: usize) {
        self.left = self.left.saturating_sub(n);
    }

    pub fn scroll_right(&mut self, n: usize) {
        self.left = self.left.saturating_add(n).min(self.max_left());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    pub const fn go_to_top(&mut self) {
        self.top = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.top = self.max_top();
    }

    /// Put `line` at the top of the screen, as far as the content allows.
    pub fn go_to_line(&mut self, line: usize) {
        self.top = line.min(self.max_top());
    }

    /// Scroll the least amount that brings `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.top {
            self.top = line;
        } else if self.height > 0 && line >= self.top + self.height as usize {
            self.go_to_line(line + 1 - self.height as usize);
        }
    }

    /// Scroll horizontally the least amount that brings `cols` on screen.
    pub fn ensure_columns_visible(&mut self, cols: Range<usize>) {
        let width = self.width as usize;
        if cols.start < self.left {
            self.left = cols.start;
        } else if width > 0 && cols.end > self.left + width {
            self.left = cols.end.saturating_sub(width).min(cols.start).min(self.max_left());
        }
    }

    /// Restore a saved origin, clamped to the current content.
    pub fn restore(&mut self, top: usize, left: usize) {
        self.top = top.min(self.max_top());
        self.left = left.min(self.max_left());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    /// Describe new content: its line count and widest line.
    pub fn set_content(&mut self, total_lines: usize, max_width: usize) {
        self.total_lines = total_lines;
        self.max_width = max_width;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.top = self.top.min(self.max_top());
        self.left = self.left.min(self.max_left());
    }

    const fn max_top(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }

    const fn max_left(&self) -> usize {
        self.max_width.saturating_sub(self.width as usize)
    }
}
