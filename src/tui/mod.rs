//! Terminal dashboard: the generic list/detail browser, the application
//! shell around two browsers, and the crossterm runtime that drives them.

#![allow(missing_docs)]

pub mod browser;
pub mod detail_loads;
pub mod focus;
pub mod input;
pub mod item;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod preferences;
pub mod render;
pub mod runtime;
pub mod screen;
pub mod selection;
pub mod sort;
pub mod terminal_guard;
pub mod text;
pub mod theme;
pub mod update;
pub mod viewport;

#[cfg(test)]
mod test_properties;

pub use runtime::{DashboardRuntimeConfig, run_dashboard};
