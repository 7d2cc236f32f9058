//! Pane composition for the dashboard.
//!
//! One header row of view tabs, a body split into the list and detail panes,
//! and one footer row of key hints. Wide terminals put the panes side by
//! side; narrow ones stack the list above the detail.

#![allow(missing_docs)]

/// Minimum terminal width below which the dashboard shows a "too small" message.
pub const MIN_USABLE_COLS: u16 = 40;
/// Minimum terminal height below which the dashboard shows a "too small" message.
pub const MIN_USABLE_ROWS: u16 = 8;

const WIDE_THRESHOLD_COLS: u16 = 80;

#[must_use]
pub const fn is_terminal_too_small(cols: u16, rows: u16) -> bool {
    cols < MIN_USABLE_COLS || rows < MIN_USABLE_ROWS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutClass {
    Narrow,
    Wide,
}

#[must_use]
pub const fn classify_layout(cols: u16) -> LayoutClass {
    if cols < WIDE_THRESHOLD_COLS {
        LayoutClass::Narrow
    } else {
        LayoutClass::Wide
    }
}

/// Rectangular placement, in cells, of one pane including its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl PaneRect {
    #[must_use]
    pub const fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    /// Area inside a one-cell border.
    #[must_use]
    pub const fn inner(self) -> Self {
        Self {
            col: self.col.saturating_add(1),
            row: self.row.saturating_add(1),
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub class: LayoutClass,
    pub header: PaneRect,
    pub list: PaneRect,
    pub detail: PaneRect,
    pub footer: PaneRect,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        build_dashboard_layout(80, 24, 40)
    }
}

impl DashboardLayout {
    /// Rows available for list entries.
    #[must_use]
    pub fn list_rows(&self) -> usize {
        usize::from(self.list.inner().height)
    }

    /// Columns available for detail text.
    #[must_use]
    pub fn detail_width(&self) -> usize {
        usize::from(self.detail.inner().width)
    }

    /// Rows available for detail text.
    #[must_use]
    pub fn detail_rows(&self) -> usize {
        usize::from(self.detail.inner().height)
    }
}

/// Split `total` into `(first, second)` with `first` taking `pct` percent.
#[must_use]
pub fn split_by_pct(total: u16, pct: u16) -> (u16, u16) {
    let pct = u32::from(pct.clamp(1, 99));
    let first = u16::try_from(u32::from(total) * pct / 100).unwrap_or(total);
    let first = first.clamp(total.min(3), total);
    (first, total - first)
}

#[must_use]
pub fn build_dashboard_layout(cols: u16, rows: u16, list_width_pct: u16) -> DashboardLayout {
    let width = cols.max(1);
    let footer_row = rows.saturating_sub(1);
    let body_top = 1_u16.min(footer_row);
    let body_height = footer_row.saturating_sub(body_top);
    let class = classify_layout(cols);

    let (list, detail) = match class {
        LayoutClass::Wide => {
            let (list_width, detail_width) = split_by_pct(width, list_width_pct);
            (
                PaneRect::new(0, body_top, list_width, body_height),
                PaneRect::new(list_width, body_top, detail_width, body_height),
            )
        }
        LayoutClass::Narrow => {
            let (list_height, detail_height) = split_by_pct(body_height, list_width_pct);
            (
                PaneRect::new(0, body_top, width, list_height),
                PaneRect::new(0, body_top + list_height, width, detail_height),
            )
        }
    };

    DashboardLayout {
        class,
        header: PaneRect::new(0, 0, width, body_top),
        list,
        detail,
        footer: PaneRect::new(0, footer_row, width, u16::from(rows > 1)),
    }
}

/// Window of `rows` entries around `selected` within `total` entries.
#[must_use]
pub fn centered_window(selected: usize, total: usize, rows: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    let rows = rows.max(1).min(total);
    let start = selected
        .saturating_sub(rows / 2)
        .min(total.saturating_sub(rows));
    let end = (start + rows).min(total);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_small_thresholds() {
        assert!(is_terminal_too_small(39, 24));
        assert!(is_terminal_too_small(80, 7));
        assert!(!is_terminal_too_small(40, 8));
    }

    #[test]
    fn wide_layout_splits_columns() {
        let layout = build_dashboard_layout(120, 30, 40);
        assert_eq!(layout.class, LayoutClass::Wide);
        assert_eq!(layout.list.width, 48);
        assert_eq!(layout.detail.col, 48);
        assert_eq!(layout.list.width + layout.detail.width, 120);
        assert_eq!(layout.list.height, 28);
        assert_eq!(layout.footer.row, 29);
        assert_eq!(layout.detail_rows(), 26);
        assert_eq!(layout.detail_width(), 70);
    }

    #[test]
    fn narrow_layout_stacks_panes() {
        let layout = build_dashboard_layout(60, 30, 40);
        assert_eq!(layout.class, LayoutClass::Narrow);
        assert_eq!(layout.list.width, 60);
        assert_eq!(layout.detail.row, layout.list.row + layout.list.height);
        assert_eq!(layout.list.height + layout.detail.height, 28);
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        for (cols, rows) in [(0, 0), (1, 1), (2, 2), (5, 3)] {
            let layout = build_dashboard_layout(cols, rows, 40);
            let _ = layout.detail_rows();
            let _ = layout.list_rows();
        }
    }

    #[test]
    fn centered_window_keeps_selection_visible() {
        assert_eq!(centered_window(0, 0, 5), (0, 0));
        assert_eq!(centered_window(0, 100, 10), (0, 10));
        assert_eq!(centered_window(50, 100, 10), (45, 55));
        assert_eq!(centered_window(99, 100, 10), (90, 100));
        assert_eq!(centered_window(2, 3, 10), (0, 3));
    }
}
