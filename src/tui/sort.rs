//! Sort state and the modal sort menu.

use crate::api::types::{SortDirection, SortOption, SortSpec};
use crate::tui::focus::BrowserKey;

/// Active sort, sent with every page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<&'static str>,
    pub direction: SortDirection,
    pub enabled: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: None,
            direction: SortDirection::Desc,
            enabled: false,
        }
    }
}

impl SortState {
    /// Same field flips direction; a different field starts descending.
    pub fn toggle(&mut self, key: &'static str) {
        if self.field == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(key);
            self.direction = SortDirection::Desc;
        }
        self.enabled = true;
    }

    /// Request parameters, if sorting is on.
    #[must_use]
    pub fn spec(&self) -> Option<SortSpec> {
        match (self.enabled, self.field) {
            (true, Some(field)) => Some(SortSpec {
                field: field.to_string(),
                direction: self.direction,
            }),
            _ => None,
        }
    }

    /// Header label such as `created ↓`.
    #[must_use]
    pub fn describe(&self, options: &[SortOption]) -> Option<String> {
        let field = self.field.filter(|_| self.enabled)?;
        let label = options
            .iter()
            .find(|o| o.key == field)
            .map_or(field, |o| o.label);
        let arrow = match self.direction {
            SortDirection::Asc => '↑',
            SortDirection::Desc => '↓',
        };
        Some(format!("{label} {arrow}"))
    }
}

/// Result of feeding a key to the open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMenuOutcome {
    Pending,
    Confirmed(&'static str),
    Cancelled,
}

/// Modal menu listing a collection's sort fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOverlay {
    options: &'static [SortOption],
    open: bool,
    highlight: usize,
}

impl SortOverlay {
    #[must_use]
    pub const fn new(options: &'static [SortOption]) -> Self {
        Self {
            options,
            open: false,
            highlight: 0,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn options(&self) -> &'static [SortOption] {
        self.options
    }

    #[must_use]
    pub const fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn open(&mut self) {
        self.open = true;
        self.highlight = 0;
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let last = self.options.len().saturating_sub(1);
        self.highlight = self.highlight.saturating_add_signed(delta).min(last);
    }

    /// Close and return the highlighted key.
    pub fn confirm(&mut self) -> Option<&'static str> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.options.get(self.highlight).map(|o| o.key)
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Dispatch one key while open.
    pub fn handle_key(&mut self, key: BrowserKey) -> SortMenuOutcome {
        match key {
            BrowserKey::Up => self.move_highlight(-1),
            BrowserKey::Down => self.move_highlight(1),
            BrowserKey::Top => self.highlight = 0,
            BrowserKey::Bottom => self.highlight = self.options.len().saturating_sub(1),
            BrowserKey::Open => {
                return self
                    .confirm()
                    .map_or(SortMenuOutcome::Cancelled, SortMenuOutcome::Confirmed);
            }
            BrowserKey::Close | BrowserKey::Sort => {
                self.cancel();
                return SortMenuOutcome::Cancelled;
            }
            _ => {}
        }
        SortMenuOutcome::Pending
    }
}
