//! The data-source seam between the dashboard and the remote API.

use crate::api::types::{Alert, Incident, Page, SortSpec};
use crate::core::errors::Result;

/// Blocking access to the incident-management API.
///
/// Calls run on detached worker threads, so implementations must be
/// shareable across threads.
pub trait DataSource: Send + Sync {
    /// Fetch one page of incidents (1-based `page`).
    fn fetch_incidents(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Incident>>;

    /// Fetch the full record for one incident.
    fn fetch_incident(&self, id: &str) -> Result<Incident>;

    /// Fetch one page of alerts (1-based `page`).
    fn fetch_alerts(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Alert>>;

    /// Fetch the full record for one alert.
    fn fetch_alert(&self, id: &str) -> Result<Alert>;

    /// Short human-readable description for headers and logs.
    fn describe(&self) -> String;
}
