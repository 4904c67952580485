//! Data layer for browser-stats.
//!
//! Loads (and optionally downloads) the usage dataset, normalizes version
//! keys into a uniform [`UsageModel`](stats_core::models::UsageModel), checks
//! region consistency and folds usage into per-region support totals.

pub mod aggregator;
pub mod checker;
pub mod fetch;
pub mod normalizer;
pub mod reader;

pub use stats_core as core;
