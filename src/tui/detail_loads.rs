//! Tracks the single detail fetch in flight.
//!
//! The tracker itself only records state. Keeping at most one request in
//! flight is enforced by the browser, which checks [`DetailLoads::is_busy`]
//! before issuing a fetch.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailLoads {
    in_flight: Option<String>,
}

impl DetailLoads {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as in flight, replacing any previous id.
    pub fn begin_load(&mut self, id: impl Into<String>) {
        self.in_flight = Some(id.into());
    }

    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.in_flight.as_deref() == Some(id)
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// A result arrived for the in-flight id.
    pub fn complete(&mut self) {
        self.in_flight = None;
    }

    /// Forget everything, e.g. when the user switches views.
    pub fn clear(&mut self) {
        self.in_flight = None;
    }
}
