//! Blocking HTTP data source backed by `ureq`.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::source::DataSource;
use crate::api::types::{Alert, Incident, Page, PageMeta, SortSpec};
use crate::core::config::ApiConfig;
use crate::core::errors::{DeckError, Result};

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope<T> {
    data: T,
}

/// `DataSource` talking JSON over HTTP with an optional bearer token.
pub struct HttpDataSource {
    agent: ureq::Agent,
    endpoint: String,
    token: Option<String>,
    page_size: u32,
    incidents_path: String,
    alerts_path: String,
}

impl HttpDataSource {
    /// Build a client from the `[api]` config section.
    #[must_use]
    pub fn from_config(api: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(&api.user_agent)
            .build();
        Self {
            agent,
            endpoint: api.endpoint.clone(),
            token: api.resolved_token(),
            page_size: api.page_size,
            incidents_path: api.incidents_path.clone(),
            alerts_path: api.alerts_path.clone(),
        }
    }

    fn collection_url(&self, segment: &str) -> String {
        format!("{}/{segment}", self.endpoint)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.agent.get(url).set("Accept", "application/json");
        for (name, value) in query {
            request = request.query(name, value);
        }
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call()?;
        response
            .into_json::<T>()
            .map_err(|error| DeckError::Serialization {
                context: "api response",
                details: format!("{url}: {error}"),
            })
    }

    fn fetch_page<T: DeserializeOwned>(
        &self,
        segment: &str,
        page: u32,
        sort: Option<&SortSpec>,
    ) -> Result<Page<T>> {
        let url = self.collection_url(segment);
        let query = list_query(page, self.page_size, sort);
        let envelope: ListEnvelope<T> = self.get_json(&url, &query)?;
        let mut meta = envelope.meta;
        meta.current_page = meta.current_page.max(1);
        Ok(Page {
            items: envelope.data,
            meta,
        })
    }

    fn fetch_one<T: DeserializeOwned>(&self, segment: &str, id: &str) -> Result<T> {
        if id.is_empty() || id.contains('/') {
            return Err(DeckError::NotFound { id: id.to_string() });
        }
        let url = format!("{}/{id}", self.collection_url(segment));
        match self.get_json::<DetailEnvelope<T>>(&url, &[]) {
            Ok(envelope) => Ok(envelope.data),
            Err(DeckError::Http { status: 404, .. }) => {
                Err(DeckError::NotFound { id: id.to_string() })
            }
            Err(other) => Err(other),
        }
    }
}

impl DataSource for HttpDataSource {
    fn fetch_incidents(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Incident>> {
        self.fetch_page(&self.incidents_path, page, sort)
    }

    fn fetch_incident(&self, id: &str) -> Result<Incident> {
        let mut incident: Incident = self.fetch_one(&self.incidents_path, id)?;
        incident.detail_loaded = true;
        Ok(incident)
    }

    fn fetch_alerts(&self, page: u32, sort: Option<&SortSpec>) -> Result<Page<Alert>> {
        self.fetch_page(&self.alerts_path, page, sort)
    }

    fn fetch_alert(&self, id: &str) -> Result<Alert> {
        let mut alert: Alert = self.fetch_one(&self.alerts_path, id)?;
        alert.detail_loaded = true;
        Ok(alert)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Query parameters for a list request.
fn list_query(page: u32, per_page: u32, sort: Option<&SortSpec>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.max(1).to_string()),
        ("per_page", per_page.to_string()),
    ];
    if let Some(sort) = sort {
        query.push(("sort", sort.field.clone()));
        query.push(("order", sort.direction.as_str().to_string()));
    }
    query
}
