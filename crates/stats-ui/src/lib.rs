//! Report layer for browser-stats.
//!
//! Turns aggregated totals into labelled rows and renders them as a
//! fixed-width, optionally coloured text table.

pub mod report;
pub mod themes;

pub use stats_core as core;
