//! Page-number tracking for a server-paginated collection.

use crate::api::types::PageMeta;

/// Current page plus next/prev availability.
///
/// `advance`/`retreat` move optimistically before the fetch returns; `settled`
/// keeps the metadata of the last page actually shown so a failed fetch can
/// put it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    meta: PageMeta,
    settled: PageMeta,
}

impl Pagination {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.meta.current_page
    }

    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Whether `advance` would move. `has_next` is not trusted past a
    /// known positive `total_pages`.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.meta.has_next
            && match self.meta.total_pages {
                Some(total) if total > 0 => self.meta.current_page < total,
                _ => true,
            }
    }

    #[must_use]
    pub const fn can_retreat(&self) -> bool {
        self.meta.has_prev && self.meta.current_page > 1
    }

    /// Move to the next page. Returns `true` if the page changed.
    ///
    /// Nothing is known about the page after the new one until its fetch
    /// lands, so further advances are refused until the next `apply`.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.meta.current_page = self.meta.current_page.saturating_add(1);
        self.meta.has_prev = true;
        self.meta.has_next = false;
        true
    }

    /// Move to the previous page. Returns `true` if the page changed.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.meta.current_page -= 1;
        self.meta.has_next = true;
        true
    }

    /// Replace all metadata from a fetch result.
    pub fn apply(&mut self, meta: PageMeta) {
        self.meta = PageMeta {
            current_page: meta.current_page.max(1),
            ..meta
        };
        self.settled = self.meta;
    }

    /// Undo optimistic moves after a failed fetch.
    pub fn restore(&mut self) {
        self.meta = self.settled;
    }

    /// Back to page 1, keeping `has_next` until the next `apply`.
    pub fn reset_to_first(&mut self) {
        self.meta.current_page = 1;
        self.meta.has_prev = false;
    }

    /// Short "page 2/5" style indicator.
    #[must_use]
    pub fn indicator(&self) -> String {
        match self.meta.total_pages {
            Some(total) if total > 0 => format!("{}/{total}", self.meta.current_page),
            _ => self.meta.current_page.to_string(),
        }
    }
}
