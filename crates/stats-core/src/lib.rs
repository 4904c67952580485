//! Core types for browser-stats.
//!
//! Holds the error taxonomy, run configuration, the normalized usage model,
//! version comparison and number formatting shared by the data and report
//! crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod version;
