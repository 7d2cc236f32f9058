//! What the browser needs to know about a record, and the English label
//! table used to describe it.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::api::types::{Alert, Incident, SortOption};
use crate::tui::theme::{self, SemanticToken};

/// Display strings, passed read-only into content generation and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub press_enter: &'static str,
    pub loading_detail: &'static str,
    pub no_selection: &'static str,
    pub empty_page: &'static str,
    pub loading_page: &'static str,
    pub fetch_failed: &'static str,
    pub retry_hint: &'static str,
    pub check_config_hint: &'static str,
    pub sort_title: &'static str,
    pub status: &'static str,
    pub urgency: &'static str,
    pub service: &'static str,
    pub created: &'static str,
    pub assignees: &'static str,
    pub description: &'static str,
    pub timeline: &'static str,
    pub severity: &'static str,
    pub source: &'static str,
    pub incident: &'static str,
    pub labels: &'static str,
    pub none: &'static str,
}

pub const ENGLISH: Labels = Labels {
    press_enter: "Press Enter to load details.",
    loading_detail: "Loading details…",
    no_selection: "Nothing selected.",
    empty_page: "No records on this page.",
    loading_page: "Loading…",
    fetch_failed: "Could not load this page",
    retry_hint: "Press r to retry.",
    check_config_hint: "Check the API endpoint and token in the config.",
    sort_title: "Sort by",
    status: "Status",
    urgency: "Urgency",
    service: "Service",
    created: "Created",
    assignees: "Assignees",
    description: "Description",
    timeline: "Timeline",
    severity: "Severity",
    source: "Source",
    incident: "Incident",
    labels: "Labels",
    none: "-",
};

impl Default for Labels {
    fn default() -> Self {
        ENGLISH
    }
}

/// A record the generic browser can page through and expand.
pub trait BrowsableItem: Clone + Send + 'static {
    /// Singular noun for logs and headers.
    const NOUN: &'static str;

    fn id(&self) -> &str;
    fn detail_loaded(&self) -> bool;
    /// Merge a fully fetched record into this summary, marking it loaded.
    fn merge_detail(&mut self, full: Self);
    fn list_label(&self) -> String;
    fn status_label(&self) -> String;
    fn status_token(&self) -> SemanticToken;
    /// Field listing for the detail pane. Extended fields only appear once
    /// the detail is loaded.
    fn detail_text(&self, labels: &Labels) -> String;
    fn sort_options() -> &'static [SortOption];
}

/// Detail-pane content for `item`, including the load affordance.
#[must_use]
pub fn detail_content<T: BrowsableItem>(item: &T, loading: bool, labels: &Labels) -> String {
    let mut text = item.detail_text(labels);
    if !item.detail_loaded() {
        text.push('\n');
        text.push_str(if loading {
            labels.loading_detail
        } else {
            labels.press_enter
        });
    }
    text
}

fn stamp(at: Option<&DateTime<Utc>>, labels: &Labels) -> String {
    at.map_or_else(
        || labels.none.to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "{name:<10} {value}");
}

pub const INCIDENT_SORT_OPTIONS: &[SortOption] = &[
    SortOption {
        label: "created",
        key: "created_at",
    },
    SortOption {
        label: "status",
        key: "status",
    },
    SortOption {
        label: "urgency",
        key: "urgency",
    },
    SortOption {
        label: "title",
        key: "title",
    },
];

pub const ALERT_SORT_OPTIONS: &[SortOption] = &[
    SortOption {
        label: "created",
        key: "created_at",
    },
    SortOption {
        label: "severity",
        key: "severity",
    },
    SortOption {
        label: "status",
        key: "status",
    },
    SortOption {
        label: "source",
        key: "source",
    },
];

impl BrowsableItem for Incident {
    const NOUN: &'static str = "incident";

    fn id(&self) -> &str {
        &self.id
    }

    fn detail_loaded(&self) -> bool {
        self.detail_loaded
    }

    fn merge_detail(&mut self, full: Self) {
        Self::merge_detail(self, full);
    }

    fn list_label(&self) -> String {
        match self.number {
            Some(n) => format!("#{n} {}", self.title),
            None => self.title.clone(),
        }
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn status_token(&self) -> SemanticToken {
        theme::incident_status_token(self.status)
    }

    fn detail_text(&self, labels: &Labels) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}  {}", self.id, self.title);
        out.push('\n');
        field(&mut out, labels.status, &self.status.to_string());
        field(&mut out, labels.urgency, &self.urgency.to_string());
        field(
            &mut out,
            labels.service,
            self.service.as_deref().unwrap_or(labels.none),
        );
        field(&mut out, labels.created, &stamp(self.created_at.as_ref(), labels));
        if !self.detail_loaded {
            return out;
        }
        let assignees = if self.assignees.is_empty() {
            labels.none.to_string()
        } else {
            self.assignees.join(", ")
        };
        field(&mut out, labels.assignees, &assignees);
        if let Some(description) = &self.description {
            let _ = write!(out, "\n{}\n{description}\n", labels.description);
        }
        if !self.timeline.is_empty() {
            let _ = write!(out, "\n{}\n", labels.timeline);
            for entry in &self.timeline {
                let _ = writeln!(
                    out,
                    "  {}  {}",
                    entry.at.format("%m-%d %H:%M"),
                    entry.message
                );
            }
        }
        out
    }

    fn sort_options() -> &'static [SortOption] {
        INCIDENT_SORT_OPTIONS
    }
}

impl BrowsableItem for Alert {
    const NOUN: &'static str = "alert";

    fn id(&self) -> &str {
        &self.id
    }

    fn detail_loaded(&self) -> bool {
        self.detail_loaded
    }

    fn merge_detail(&mut self, full: Self) {
        Self::merge_detail(self, full);
    }

    fn list_label(&self) -> String {
        self.summary.clone()
    }

    fn status_label(&self) -> String {
        self.severity.to_string()
    }

    fn status_token(&self) -> SemanticToken {
        theme::severity_token(self.severity)
    }

    fn detail_text(&self, labels: &Labels) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}  {}", self.id, self.summary);
        out.push('\n');
        field(&mut out, labels.severity, &self.severity.to_string());
        field(&mut out, labels.status, &self.status.to_string());
        field(
            &mut out,
            labels.source,
            self.source.as_deref().unwrap_or(labels.none),
        );
        field(
            &mut out,
            labels.incident,
            self.incident_id.as_deref().unwrap_or(labels.none),
        );
        field(&mut out, labels.created, &stamp(self.created_at.as_ref(), labels));
        if !self.detail_loaded {
            return out;
        }
        if !self.labels.is_empty() {
            let _ = write!(out, "\n{}\n", labels.labels);
            for (key, value) in &self.labels {
                let _ = writeln!(out, "  {key}={value}");
            }
        }
        if let Some(body) = &self.body {
            let _ = write!(out, "\n{body}\n");
        }
        out
    }

    fn sort_options() -> &'static [SortOption] {
        ALERT_SORT_OPTIONS
    }
}
