//! Cross-region consistency diagnostics.
//!
//! Compares each real region's browser and version key sets against global.
//! Mismatches are logged and returned; they never change the model or stop
//! the run.

use std::collections::BTreeSet;
use std::fmt;

use stats_core::models::{UsageModel, VersionUsage, GLOBAL_REGION};
use tracing::warn;

/// A difference between a region and the global dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaMismatch {
    /// Browsers present in only one of region / global.
    Browsers {
        region: String,
        browsers: BTreeSet<String>,
    },
    /// Versions of one browser present in only one of region / global.
    Versions {
        region: String,
        browser: String,
        versions: BTreeSet<String>,
    },
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaMismatch::Browsers { region, browsers } => write!(
                f,
                "Browsers different between {GLOBAL_REGION} and {region}: {}",
                join(browsers)
            ),
            SchemaMismatch::Versions {
                region,
                browser,
                versions,
            } => write!(
                f,
                "{browser} versions different for {GLOBAL_REGION} and {region}: {}",
                join(versions)
            ),
        }
    }
}

/// Check every real region against global and log each mismatch as a warning.
pub fn check_consistency(model: &UsageModel) -> Vec<SchemaMismatch> {
    let global = model.global();
    let mut mismatches = Vec::new();

    for region in model.real_regions() {
        let Some(usage) = model.region(region) else {
            continue;
        };

        let browsers = symmetric_difference(global.keys(), usage.keys());
        if !browsers.is_empty() {
            mismatches.push(SchemaMismatch::Browsers {
                region: region.to_string(),
                browsers,
            });
        }

        for (browser, global_versions) in global {
            let Some(region_versions) = usage.get(browser) else {
                continue;
            };
            let versions = version_difference(global_versions, region_versions);
            if !versions.is_empty() {
                mismatches.push(SchemaMismatch::Versions {
                    region: region.to_string(),
                    browser: browser.clone(),
                    versions,
                });
            }
        }
    }

    for mismatch in &mismatches {
        warn!("{}", mismatch);
    }
    mismatches
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn symmetric_difference<'a>(
    a: impl Iterator<Item = &'a String>,
    b: impl Iterator<Item = &'a String>,
) -> BTreeSet<String> {
    let a: BTreeSet<&String> = a.collect();
    let b: BTreeSet<&String> = b.collect();
    a.symmetric_difference(&b).map(|s| (*s).clone()).collect()
}

fn version_difference(a: &VersionUsage, b: &VersionUsage) -> BTreeSet<String> {
    symmetric_difference(a.keys(), b.keys())
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
