//! Bounded in-memory ring of recent activity, shown by the log overlay.

use std::collections::VecDeque;

use crate::logger::jsonl::ActivityEntry;

pub const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub struct LogRing {
    capacity: usize,
    entries: VecDeque<ActivityEntry>,
    dropped: u64,
}

impl Default for LogRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogRing {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Append, evicting the oldest entry when full.
    pub fn push(&mut self, entry: ActivityEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted since creation.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// The newest `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::jsonl::ActivityEvent;

    fn entry(view: &str) -> ActivityEntry {
        ActivityEntry::new(ActivityEvent::SessionEnd {
            view: view.to_string(),
        })
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut ring = LogRing::with_capacity(2);
        ring.push(entry("a"));
        ring.push(entry("b"));
        ring.push(entry("c"));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.dropped(), 1);
        let views: Vec<String> = ring.tail(10).map(|e| e.event.summary()).collect();
        assert_eq!(views, ["session ended on b", "session ended on c"]);
    }

    #[test]
    fn tail_returns_newest_in_order() {
        let mut ring = LogRing::default();
        assert!(ring.is_empty());
        for v in ["a", "b", "c", "d"] {
            ring.push(entry(v));
        }
        let views: Vec<String> = ring.tail(2).map(|e| e.event.summary()).collect();
        assert_eq!(views, ["session ended on c", "session ended on d"]);
        assert_eq!(
            ring.latest().map(|e| e.event.summary()).as_deref(),
            Some("session ended on d")
        );
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut ring = LogRing::with_capacity(0);
        ring.push(entry("a"));
        ring.push(entry("b"));
        assert_eq!(ring.len(), 1);
    }
}
