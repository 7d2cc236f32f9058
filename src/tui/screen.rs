//! Cell grid that rendering writes into and the runtime paints.

#![allow(missing_docs)]

use unicode_width::UnicodeWidthChar;

use crate::tui::layout::PaneRect;
use crate::tui::theme::SemanticToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub token: SemanticToken,
    pub bold: bool,
    pub reverse: bool,
}

impl CellStyle {
    #[must_use]
    pub const fn plain() -> Self {
        Self::token(SemanticToken::Neutral)
    }

    #[must_use]
    pub const fn token(token: SemanticToken) -> Self {
        Self {
            token,
            bold: false,
            reverse: false,
        }
    }

    #[must_use]
    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            reverse: true,
            ..self
        }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::plain()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
    /// Right half of a double-width character; not painted.
    pub continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::plain(),
            continuation: false,
        }
    }
}

/// Fixed-size grid of styled cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl ScreenBuffer {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); usize::from(cols) * usize::from(rows)],
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    #[must_use]
    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        let start = usize::from(row) * usize::from(self.cols);
        &self.cells[start..start + usize::from(self.cols)]
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let idx = usize::from(row) * usize::from(self.cols) + usize::from(col);
        self.cells.get_mut(idx)
    }

    /// Write `text` at (`col`, `row`), clipped to `max_width` columns and the
    /// buffer edge. Returns the number of columns written.
    pub fn put_str(
        &mut self,
        col: u16,
        row: u16,
        text: &str,
        style: CellStyle,
        max_width: usize,
    ) -> usize {
        let limit = max_width.min(usize::from(self.cols.saturating_sub(col)));
        let mut used = 0_usize;
        for ch in text.chars() {
            let ch = if ch.is_control() { ' ' } else { ch };
            let width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if width == 0 {
                continue;
            }
            if used + width > limit {
                break;
            }
            let x = col + u16::try_from(used).unwrap_or(u16::MAX);
            if let Some(cell) = self.cell_mut(x, row) {
                *cell = Cell {
                    ch,
                    style,
                    continuation: false,
                };
            }
            if width == 2 {
                if let Some(cell) = self.cell_mut(x + 1, row) {
                    *cell = Cell {
                        ch: ' ',
                        style,
                        continuation: true,
                    };
                }
            }
            used += width;
        }
        used
    }

    /// Fill `width` cells of a row with spaces in `style`.
    pub fn fill(&mut self, col: u16, row: u16, width: u16, style: CellStyle) {
        for x in col..col.saturating_add(width) {
            if let Some(cell) = self.cell_mut(x, row) {
                *cell = Cell {
                    ch: ' ',
                    style,
                    continuation: false,
                };
            }
        }
    }

    /// Draw a single-line border around `rect` with an optional title.
    pub fn draw_box(&mut self, rect: PaneRect, title: &str, style: CellStyle) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let right = rect.col + rect.width - 1;
        let bottom = rect.row + rect.height - 1;
        for x in rect.col..=right {
            let (top_ch, bottom_ch) = if x == rect.col {
                ('┌', '└')
            } else if x == right {
                ('┐', '┘')
            } else {
                ('─', '─')
            };
            self.put_char(x, rect.row, top_ch, style);
            self.put_char(x, bottom, bottom_ch, style);
        }
        for y in rect.row + 1..bottom {
            self.put_char(rect.col, y, '│', style);
            self.put_char(right, y, '│', style);
        }
        if !title.is_empty() && rect.width > 4 {
            let label = format!(" {title} ");
            self.put_str(
                rect.col + 1,
                rect.row,
                &label,
                style.bold(),
                usize::from(rect.width - 2),
            );
        }
    }

    fn put_char(&mut self, col: u16, row: u16, ch: char, style: CellStyle) {
        if let Some(cell) = self.cell_mut(col, row) {
            *cell = Cell {
                ch,
                style,
                continuation: false,
            };
        }
    }

    /// Text of one row, trailing spaces trimmed.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        let text: String = self
            .row(row)
            .iter()
            .filter(|c| !c.continuation)
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    /// Whole buffer as plain text, one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        (0..self.rows)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        (0..self.rows).any(|r| self.row_text(r).contains(needle))
    }
}
