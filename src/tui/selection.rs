//! Cursor into the current page's items.

/// Selection cursor. When `len == 0` there is no selection and the cursor
/// rests on the sentinel `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    cursor: usize,
    len: usize,
}

impl Selection {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { cursor: 0, len }
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the selected item, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Returns `true` if the cursor moved.
    pub fn move_down(&mut self) -> bool {
        if self.cursor + 1 < self.len {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn move_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn last(&mut self) -> bool {
        let target = self.len.saturating_sub(1);
        let moved = self.cursor != target;
        self.cursor = target;
        moved
    }

    /// Adopt a new collection length, clamping the cursor into range.
    pub fn reconcile(&mut self, new_len: usize) {
        self.len = new_len;
        if self.cursor >= new_len {
            self.cursor = new_len.saturating_sub(1);
        }
    }

    /// Back to the first row. Returns `true` if the cursor moved.
    pub fn reset(&mut self) -> bool {
        self.first()
    }
}
