//! Incident-management API: record types, the data-source seam and its
//! HTTP and in-memory implementations.

pub mod fixtures;
#[cfg(feature = "http")]
pub mod http;
pub mod source;
pub mod types;

pub use fixtures::StaticDataSource;
#[cfg(feature = "http")]
pub use http::HttpDataSource;
pub use source::DataSource;
pub use types::{
    Alert, AlertStatus, Incident, IncidentStatus, Page, PageMeta, Severity, SortDirection,
    SortOption, SortSpec, TimelineEntry, Urgency,
};
