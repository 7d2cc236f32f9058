//! Wire and domain types for incidents, alerts and paginated collections.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ──────────────────── pagination ────────────────────

/// Pagination metadata returned alongside each page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-based page number.
    #[serde(rename = "page")]
    pub current_page: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            has_next: false,
            has_prev: false,
            total_pages: None,
            total_count: None,
        }
    }
}

/// One server-paginated batch of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

// ──────────────────── sorting ────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort parameters sent with a page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// One entry of a collection's sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub label: &'static str,
    pub key: &'static str,
}

// ──────────────────── incidents ────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Triggered,
    Acknowledged,
    Resolved,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Triggered => "triggered",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    #[default]
    Low,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Low => "low",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// An incident record. Summary fields arrive with list pages; the rest
/// is populated once the detail is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    #[serde(default)]
    pub number: Option<u64>,
    pub title: String,
    pub status: IncidentStatus,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,

    #[serde(skip)]
    pub detail_loaded: bool,
}

impl Incident {
    /// Copy the extended fields of a fully fetched record into this one.
    pub fn merge_detail(&mut self, full: Self) {
        self.number = full.number.or(self.number);
        self.title = full.title;
        self.status = full.status;
        self.urgency = full.urgency;
        self.service = full.service.or_else(|| self.service.take());
        self.created_at = full.created_at.or(self.created_at);
        self.description = full.description;
        self.assignees = full.assignees;
        self.timeline = full.timeline;
        self.detail_loaded = true;
    }
}

// ──────────────────── alerts ────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Triggered,
    Resolved,
    Suppressed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Triggered => "triggered",
            Self::Resolved => "resolved",
            Self::Suppressed => "suppressed",
            Self::Unknown => "unknown",
        })
    }
}

/// An alert record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub summary: String,
    pub severity: Severity,
    pub status: AlertStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub incident_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(skip)]
    pub detail_loaded: bool,
}

impl Alert {
    pub fn merge_detail(&mut self, full: Self) {
        self.summary = full.summary;
        self.severity = full.severity;
        self.status = full.status;
        self.source = full.source.or_else(|| self.source.take());
        self.incident_id = full.incident_id.or_else(|| self.incident_id.take());
        self.created_at = full.created_at.or(self.created_at);
        self.body = full.body;
        self.labels = full.labels;
        self.detail_loaded = true;
    }
}
