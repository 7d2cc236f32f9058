//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DeckError, Result};
use crate::core::paths;

/// Full incident_deck configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub paths: PathsConfig,
}

/// Remote incident-management API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://oncall.example.com/api/v1`.
    pub endpoint: String,
    /// Bearer token. Prefer `token_env` so secrets stay out of the file.
    pub token: Option<String>,
    /// Name of an environment variable holding the bearer token.
    pub token_env: Option<String>,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub user_agent: String,
    pub incidents_path: String,
    pub alerts_path: String,
}

/// Dashboard layout and loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Share of the terminal width given to the list pane.
    pub list_width_pct: u16,
    /// Input poll interval for the event loop.
    pub tick_ms: u64,
}

/// Filesystem paths used by incident_deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub activity_log: PathBuf,
    pub preferences_file: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/v1".to_string(),
            token: None,
            token_env: Some("DECK_API_TOKEN".to_string()),
            timeout_secs: 15,
            page_size: 25,
            user_agent: format!("incident-deck/{}", env!("CARGO_PKG_VERSION")),
            incidents_path: "incidents".to_string(),
            alerts_path: "alerts".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            list_width_pct: 40,
            tick_ms: 100,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data = paths::data_dir();
        Self {
            config_file: paths::config_dir().join("config.toml"),
            activity_log: data.join("activity.jsonl"),
            preferences_file: paths::config_dir().join("preferences.json"),
        }
    }
}

impl ApiConfig {
    /// Effective bearer token: explicit `token` wins over `token_env`.
    #[must_use]
    pub fn resolved_token(&self) -> Option<String> {
        self.resolved_token_from(|name| env::var(name).ok())
    }

    fn resolved_token_from<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = self.token.as_ref().filter(|t| !t.trim().is_empty()) {
            return Some(token.clone());
        }
        self.token_env
            .as_deref()
            .and_then(lookup)
            .filter(|t| !t.trim().is_empty())
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| DeckError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(DeckError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Render the effective config as TOML (token redacted).
    pub fn to_toml_redacted(&self) -> Result<String> {
        let mut redacted = self.clone();
        if redacted.api.token.is_some() {
            redacted.api.token = Some("<redacted>".to_string());
        }
        Ok(toml::to_string_pretty(&redacted)?)
    }

    /// Deterministic hash of the effective config for the activity log.
    ///
    /// FNV-1a over canonical JSON so the value is stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("DECK_API_ENDPOINT") {
            self.api.endpoint = raw;
        }
        if let Some(raw) = lookup("DECK_API_TOKEN_ENV") {
            self.api.token_env = Some(raw);
        }
        if let Some(raw) = lookup("DECK_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_env_u64("DECK_API_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("DECK_API_PAGE_SIZE") {
            self.api.page_size = parse_env_u32("DECK_API_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("DECK_DASHBOARD_LIST_WIDTH_PCT") {
            self.dashboard.list_width_pct = parse_env_u16("DECK_DASHBOARD_LIST_WIDTH_PCT", &raw)?;
        }
        if let Some(raw) = lookup("DECK_DASHBOARD_TICK_MS") {
            self.dashboard.tick_ms = parse_env_u64("DECK_DASHBOARD_TICK_MS", &raw)?;
        }
        if let Some(raw) = lookup("DECK_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("DECK_PREFERENCES_FILE") {
            self.paths.preferences_file = PathBuf::from(raw);
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.api.endpoint.trim().trim_end_matches('/').to_string();
        self.api.endpoint = trimmed;
        for segment in [&mut self.api.incidents_path, &mut self.api.alerts_path] {
            *segment = segment.trim().trim_matches('/').to_string();
        }
        self.paths.activity_log = paths::expand_tilde(&self.paths.activity_log);
        self.paths.preferences_file = paths::expand_tilde(&self.paths.preferences_file);
    }

    fn validate(&self) -> Result<()> {
        let endpoint = self.api.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(DeckError::InvalidConfig {
                details: format!("api.endpoint must be an http(s) URL, got {endpoint:?}"),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(DeckError::InvalidConfig {
                details: "api.timeout_secs must be > 0".to_string(),
            });
        }
        if !(1..=500).contains(&self.api.page_size) {
            return Err(DeckError::InvalidConfig {
                details: format!("api.page_size must be in [1, 500], got {}", self.api.page_size),
            });
        }
        for (name, segment) in [
            ("incidents_path", &self.api.incidents_path),
            ("alerts_path", &self.api.alerts_path),
        ] {
            if segment.is_empty() {
                return Err(DeckError::InvalidConfig {
                    details: format!("api.{name} must not be empty"),
                });
            }
        }
        if !(20..=80).contains(&self.dashboard.list_width_pct) {
            return Err(DeckError::InvalidConfig {
                details: format!(
                    "dashboard.list_width_pct must be in [20, 80], got {}",
                    self.dashboard.list_width_pct
                ),
            });
        }
        if !(10..=1_000).contains(&self.dashboard.tick_ms) {
            return Err(DeckError::InvalidConfig {
                details: format!(
                    "dashboard.tick_ms must be in [10, 1000], got {}",
                    self.dashboard.tick_ms
                ),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|error| DeckError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_u32(name: &str, raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|error| DeckError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_u16(name: &str, raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().map_err(|error| DeckError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}
