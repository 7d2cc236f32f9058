//! In-memory data source for `--demo` mode and tests.

#![allow(missing_docs)]

use std::collections::{BTreeMap, HashSet};
use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::api::source::DataSource;
use crate::api::types::{
    Alert, AlertStatus, Incident, IncidentStatus, Page, PageMeta, Severity, SortDirection,
    SortSpec, TimelineEntry, Urgency,
};
use crate::core::errors::{DeckError, Result};

/// Base timestamp for generated records (2026-03-01T00:00:00Z).
const DEMO_EPOCH: i64 = 1_772_323_200;

/// Serves full records from memory, paginated and sorted like the real API.
#[derive(Debug, Clone)]
pub struct StaticDataSource {
    incidents: Vec<Incident>,
    alerts: Vec<Alert>,
    page_size: usize,
    failing_pages: HashSet<u32>,
    failing_details: HashSet<String>,
}

impl StaticDataSource {
    #[must_use]
    pub fn new(incidents: Vec<Incident>, alerts: Vec<Alert>, page_size: usize) -> Self {
        Self {
            incidents,
            alerts,
            page_size: page_size.max(1),
            failing_pages: HashSet::new(),
            failing_details: HashSet::new(),
        }
    }

    /// Deterministic demo data set.
    #[must_use]
    pub fn demo(page_size: usize) -> Self {
        Self::new(demo_incidents(57), demo_alerts(83), page_size)
    }

    /// Make every list request for `page` fail.
    #[must_use]
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Make every detail request for `id` fail.
    #[must_use]
    pub fn with_failing_detail(mut self, id: impl Into<String>) -> Self {
        self.failing_details.insert(id.into());
        self
    }

    fn check_page(&self, page: u32) -> Result<()> {
        if self.failing_pages.contains(&page) {
            return Err(DeckError::Http {
                status: 503,
                details: format!("fixture page {page} unavailable"),
            });
        }
        Ok(())
    }

    fn check_detail(&self, id: &str) -> Result<()> {
        if self.failing_details.contains(id) {
            return Err(DeckError::Transport {
                endpoint: "fixtures".to_string(),
                details: format!("fixture detail {id} unavailable"),
            });
        }
        Ok(())
    }
}

impl DataSource for StaticDataSource {
    fn fetch_incidents(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Incident>> {
        self.check_page(page)?;
        let mut rows: Vec<Incident> = self.incidents.iter().map(incident_summary).collect();
        if let Some(sort) = sort {
            rows.sort_by(|a, b| directed(compare_incidents(a, b, &sort.field), sort.direction));
        }
        Ok(paginate(rows, page, self.page_size))
    }

    fn fetch_incident(&self, id: &str) -> Result<Incident> {
        self.check_detail(id)?;
        let mut full = self
            .incidents
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| DeckError::NotFound { id: id.to_string() })?;
        full.detail_loaded = true;
        Ok(full)
    }

    fn fetch_alerts(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Alert>> {
        self.check_page(page)?;
        let mut rows: Vec<Alert> = self.alerts.iter().map(alert_summary).collect();
        if let Some(sort) = sort {
            rows.sort_by(|a, b| directed(compare_alerts(a, b, &sort.field), sort.direction));
        }
        Ok(paginate(rows, page, self.page_size))
    }

    fn fetch_alert(&self, id: &str) -> Result<Alert> {
        self.check_detail(id)?;
        let mut full = self
            .alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| DeckError::NotFound { id: id.to_string() })?;
        full.detail_loaded = true;
        Ok(full)
    }

    fn describe(&self) -> String {
        "demo fixtures".to_string()
    }
}

fn paginate<T>(rows: Vec<T>, page: u32, page_size: usize) -> Page<T> {
    let total = rows.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let current = usize::try_from(page.max(1)).unwrap_or(usize::MAX).min(total_pages);
    let items = rows
        .into_iter()
        .skip((current - 1) * page_size)
        .take(page_size)
        .collect();
    Page {
        items,
        meta: PageMeta {
            current_page: u32::try_from(current).unwrap_or(u32::MAX),
            has_next: current < total_pages,
            has_prev: current > 1,
            total_pages: u32::try_from(total_pages).ok(),
            total_count: Some(total as u64),
        },
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_incidents(a: &Incident, b: &Incident, field: &str) -> Ordering {
    match field {
        "created_at" => a.created_at.cmp(&b.created_at),
        "status" => a.status.to_string().cmp(&b.status.to_string()),
        "urgency" => a.urgency.to_string().cmp(&b.urgency.to_string()),
        "title" => a.title.cmp(&b.title),
        _ => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

fn compare_alerts(a: &Alert, b: &Alert, field: &str) -> Ordering {
    match field {
        "created_at" => a.created_at.cmp(&b.created_at),
        // critical sorts highest
        "severity" => b.severity.cmp(&a.severity),
        "status" => a.status.to_string().cmp(&b.status.to_string()),
        "source" => a.source.cmp(&b.source),
        _ => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

fn incident_summary(full: &Incident) -> Incident {
    Incident {
        description: None,
        assignees: Vec::new(),
        timeline: Vec::new(),
        detail_loaded: false,
        ..full.clone()
    }
}

fn alert_summary(full: &Alert) -> Alert {
    Alert {
        body: None,
        labels: BTreeMap::new(),
        detail_loaded: false,
        ..full.clone()
    }
}

fn demo_time(offset_minutes: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(DEMO_EPOCH + offset_minutes * 60, 0)
}

const SERVICES: [&str; 6] = ["checkout", "payments", "search", "auth", "ingest", "billing"];
const SYMPTOMS: [&str; 5] = [
    "elevated 5xx rate",
    "p99 latency above SLO",
    "queue backlog growing",
    "replica lag",
    "certificate expiring",
];
const PEOPLE: [&str; 4] = ["ana", "bo", "chidi", "dara"];

/// Generate `count` deterministic incidents, newest first.
#[must_use]
pub fn demo_incidents(count: usize) -> Vec<Incident> {
    (0..count)
        .map(|i| {
            let service = SERVICES[i % SERVICES.len()];
            let symptom = SYMPTOMS[i % SYMPTOMS.len()];
            let status = match i % 3 {
                0 => IncidentStatus::Triggered,
                1 => IncidentStatus::Acknowledged,
                _ => IncidentStatus::Resolved,
            };
            let minutes = i64::try_from(count - i).unwrap_or(0) * 37;
            let timeline = (0..=(i % 4))
                .map(|step| TimelineEntry {
                    at: demo_time(minutes + i64::try_from(step).unwrap_or(0) * 5)
                        .unwrap_or_default(),
                    message: match step {
                        0 => format!("triggered by {service} monitor"),
                        1 => format!("acknowledged by {}", PEOPLE[i % PEOPLE.len()]),
                        2 => "mitigation deployed".to_string(),
                        _ => "resolved".to_string(),
                    },
                })
                .collect();
            Incident {
                id: format!("INC{:04}", 1000 + i),
                number: Some(1000 + i as u64),
                title: format!("{service}: {symptom}"),
                status,
                urgency: if i % 4 == 0 { Urgency::High } else { Urgency::Low },
                service: Some(service.to_string()),
                created_at: demo_time(minutes),
                description: Some(format!(
                    "The {service} service reported {symptom}. On-call was paged and is \
                     investigating recent deploys, upstream dependencies and saturation \
                     metrics for the affected region."
                )),
                assignees: vec![PEOPLE[i % PEOPLE.len()].to_string()],
                timeline,
                detail_loaded: false,
            }
        })
        .collect()
}

/// Generate `count` deterministic alerts.
#[must_use]
pub fn demo_alerts(count: usize) -> Vec<Alert> {
    (0..count)
        .map(|i| {
            let service = SERVICES[i % SERVICES.len()];
            let severity = match i % 4 {
                0 => Severity::Critical,
                1 => Severity::Error,
                2 => Severity::Warning,
                _ => Severity::Info,
            };
            let mut labels = BTreeMap::new();
            labels.insert("service".to_string(), service.to_string());
            labels.insert("region".to_string(), format!("region-{}", i % 3 + 1));
            labels.insert("host".to_string(), format!("{service}-{}", i % 7));
            Alert {
                id: format!("ALR{:05}", 50_000 + i),
                summary: format!("{service} {}", SYMPTOMS[i % SYMPTOMS.len()]),
                severity,
                status: if i % 5 == 0 {
                    AlertStatus::Resolved
                } else {
                    AlertStatus::Triggered
                },
                source: Some(format!("prometheus/{service}")),
                incident_id: (i % 2 == 0).then(|| format!("INC{:04}", 1000 + i / 2)),
                created_at: demo_time(i64::try_from(count - i).unwrap_or(0) * 11),
                body: Some(format!(
                    "Rule {service}_{} fired for {} consecutive evaluations.\nRunbook: \
                     https://runbooks.example.com/{service}",
                    i % SYMPTOMS.len(),
                    i % 9 + 1
                )),
                labels,
                detail_loaded: false,
            }
        })
        .collect()
}
