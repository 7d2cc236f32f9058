#![forbid(unsafe_code)]

//! incident_deck (ideck): keyboard-driven terminal dashboard for incidents
//! and alerts served by an incident-management API.
//!
//! The heart of the crate is a generic list/detail browser
//! ([`tui::browser::Browser`]) that pages through a server collection, keeps
//! a cursor and a scrollable detail pane consistent, fetches full records on
//! demand and drops out-of-order results. The dashboard shell composes one
//! browser per collection.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use incident_deck::prelude::*;
//!
//! let source = StaticDataSource::demo(25);
//! let page = source.fetch_incidents(1, None).unwrap();
//! assert!(page.meta.has_next);
//! ```

pub mod prelude;

pub mod api;
pub mod core;
pub mod logger;
pub mod tui;
