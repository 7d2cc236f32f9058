//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use incident_deck::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{DeckError, Result};

// API
#[cfg(feature = "http")]
pub use crate::api::http::HttpDataSource;
pub use crate::api::{
    Alert, DataSource, Incident, Page, PageMeta, SortDirection, SortSpec, StaticDataSource,
};

// Browser
pub use crate::tui::browser::{Browser, BrowserCmd, BrowserMsg};
pub use crate::tui::focus::{BrowserKey, Focus};
pub use crate::tui::item::{BrowsableItem, ENGLISH, Labels};

// Dashboard
pub use crate::tui::model::{DashboardCmd, DashboardModel, DashboardMsg, ModelOptions, View};
pub use crate::tui::runtime::{DashboardRuntimeConfig, perform_fetch, run_dashboard};
pub use crate::tui::update::update;
