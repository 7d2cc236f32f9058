//! Core types: errors, configuration, shared paths.

pub mod config;
pub mod errors;
pub mod paths;
