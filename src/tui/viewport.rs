//! Scrollable detail-pane buffer.
//!
//! The viewport owns the raw detail text, its wrapped form for the current
//! pane width, and the scroll offset. `scroll_offset` is kept within
//! `0..=max_scroll()` after every operation, and `max_scroll` is derived
//! from the wrapped line count and the visible height.

use crate::tui::text;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    source: String,
    lines: Vec<String>,
    width: usize,
    visible_lines: usize,
    scroll_offset: usize,
    identity: Option<String>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: usize, visible_lines: usize) -> Self {
        Self {
            width: width.max(1),
            visible_lines,
            ..Self::default()
        }
    }

    // ──────────────────── content ────────────────────

    /// Replace content for the item already displayed. Scroll is kept
    /// (clamped if the content got shorter).
    pub fn set_content(&mut self, text: &str) {
        text.clone_into(&mut self.source);
        self.rewrap();
    }

    /// Show content for a different item, scrolled to the top.
    pub fn reset_to(&mut self, text: &str, identity: Option<String>) {
        text.clone_into(&mut self.source);
        self.identity = identity;
        self.scroll_offset = 0;
        self.rewrap();
    }

    /// Drop content and identity (no selection).
    pub fn clear(&mut self) {
        self.reset_to("", None);
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines currently inside the window.
    #[must_use]
    pub fn visible(&self) -> &[String] {
        let start = self.scroll_offset.min(self.lines.len());
        let end = (start + self.visible_lines).min(self.lines.len());
        &self.lines[start..end]
    }

    // ──────────────────── geometry ────────────────────

    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.visible_lines)
    }

    pub fn set_visible_lines(&mut self, visible_lines: usize) {
        self.visible_lines = visible_lines;
        self.clamp();
    }

    /// New pane size. A width change re-wraps the content.
    pub fn resize(&mut self, width: usize, visible_lines: usize) {
        let width = width.max(1);
        self.visible_lines = visible_lines;
        if width == self.width {
            self.clamp();
        } else {
            self.width = width;
            self.rewrap();
        }
    }

    // ──────────────────── scrolling ────────────────────

    /// Returns `true` if the offset changed.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let before = self.scroll_offset;
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(delta)
            .min(self.max_scroll());
        self.scroll_offset != before
    }

    /// Half the visible height, at least one line.
    #[must_use]
    pub fn page_step(&self) -> usize {
        (self.visible_lines / 2).max(1)
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(isize::try_from(self.page_step()).unwrap_or(isize::MAX))
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-isize::try_from(self.page_step()).unwrap_or(isize::MAX))
    }

    pub fn goto_top(&mut self) -> bool {
        let moved = self.scroll_offset != 0;
        self.scroll_offset = 0;
        moved
    }

    pub fn goto_bottom(&mut self) -> bool {
        let target = self.max_scroll();
        let moved = self.scroll_offset != target;
        self.scroll_offset = target;
        moved
    }

    /// Percentage scrolled, for the pane footer.
    #[must_use]
    pub fn percent(&self) -> u16 {
        let max = self.max_scroll();
        if max == 0 {
            return 100;
        }
        u16::try_from(self.scroll_offset * 100 / max).unwrap_or(100)
    }

    fn rewrap(&mut self) {
        self.lines = text::wrap(&self.source, self.width);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }
}
