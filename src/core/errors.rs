//! DECK-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Top-level error type for incident_deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("[DECK-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DECK-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DECK-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DECK-2001] transport failure talking to {endpoint}: {details}")]
    Transport { endpoint: String, details: String },

    #[error("[DECK-2002] API returned HTTP {status}: {details}")]
    Http { status: u16, details: String },

    #[error("[DECK-2003] authentication rejected by {endpoint}")]
    Unauthorized { endpoint: String },

    #[error("[DECK-2004] record not found: {id}")]
    NotFound { id: String },

    #[error("[DECK-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DECK-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[DECK-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl DeckError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DECK-1001",
            Self::MissingConfig { .. } => "DECK-1002",
            Self::ConfigParse { .. } => "DECK-1003",
            Self::Transport { .. } => "DECK-2001",
            Self::Http { .. } => "DECK-2002",
            Self::Unauthorized { .. } => "DECK-2003",
            Self::NotFound { .. } => "DECK-2004",
            Self::Serialization { .. } => "DECK-2101",
            Self::Io { .. } => "DECK-3002",
            Self::Runtime { .. } => "DECK-3900",
        }
    }

    /// Whether retrying might resolve the failure. Decides the hint shown
    /// under a failed page.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Io { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DeckError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DeckError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<ureq::Error> for DeckError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(401 | 403, response) => Self::Unauthorized {
                endpoint: response.get_url().to_string(),
            },
            ureq::Error::Status(status, response) => {
                let url = response.get_url().to_string();
                let body = response.into_string().unwrap_or_default();
                let body = body.trim();
                let details = if body.is_empty() {
                    url
                } else {
                    format!("{url}: {}", body.chars().take(200).collect::<String>())
                };
                Self::Http { status, details }
            }
            ureq::Error::Transport(transport) => Self::Transport {
                endpoint: transport
                    .url()
                    .map_or_else(|| "<unknown>".to_string(), ToString::to_string),
                details: transport.to_string(),
            },
        }
    }
}
