//! Version key normalization.
//!
//! The upstream dataset keys versions inconsistently: preview builds use
//! sentinel tokens, some releases are keyed by ranges like `"15.2-15.3"`, and
//! regional files record browsers without a per-version breakdown under a
//! single `"0"` key. This module rewrites all of them into plain dotted
//! versions so the aggregator can compare every key.
//!
//! Normalization never edits a map in place. Each browser's versions are
//! rebuilt into a fresh map and the whole model is returned as a new value.

use stats_core::error::Result;
use stats_core::models::{NoVersionTracking, RegionUsage, UsageModel, VersionUsage};
use stats_core::version::max_version_key;
use tracing::{debug, warn};

/// Keys used by the dataset for preview/unreleased builds: Safari Technology
/// Preview and Opera Mini's versionless `"all"`.
pub const PREVIEW_KEYS: [&str; 2] = ["TP", "all"];

/// Key that preview builds are rewritten to. Sorts above every real release.
pub const PREVIEW_VERSION: &str = "9999";

/// Catch-all key used when a region has no per-version breakdown.
pub const NO_BREAKDOWN_KEY: &str = "0";

/// Normalized usage plus the browsers flagged as lacking version tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUsage {
    pub model: UsageModel,
    pub no_version_tracking: NoVersionTracking,
}

/// Canonical form of a single version key.
///
/// Sentinels become [`PREVIEW_VERSION`]; a range `"A-B"` becomes `"A"`.
/// Anything else, including malformed ranges such as `"-5"`, is returned
/// unchanged so version parsing rejects it later.
pub fn canonical_key(key: &str) -> &str {
    if PREVIEW_KEYS.contains(&key) {
        return PREVIEW_VERSION;
    }
    match key.split_once('-') {
        Some((start, end)) if !start.is_empty() && !end.is_empty() => start,
        _ => key,
    }
}

/// Rebuild one browser's versions under canonical keys.
///
/// Shares of keys that collapse onto the same canonical key are summed.
pub fn normalize_versions(versions: &VersionUsage) -> VersionUsage {
    let mut normalized = VersionUsage::new();
    for (key, share) in versions {
        *normalized
            .entry(canonical_key(key).to_string())
            .or_insert(0.0) += share;
    }
    normalized
}

/// Normalize every region of `model`.
///
/// Global keys are canonicalized first. Each real region is then
/// canonicalized and its `"0"` entries re-keyed under the highest global
/// version of the same browser.
pub fn normalize(model: &UsageModel) -> Result<NormalizedUsage> {
    let global = normalize_region(model.global());
    let mut normalized = UsageModel::new(global.clone());
    let mut no_version_tracking = NoVersionTracking::new();

    for region in model.real_regions() {
        let Some(usage) = model.region(region) else {
            continue;
        };

        let mut rebuilt = RegionUsage::new();
        for (browser, versions) in usage {
            let mut versions = normalize_versions(versions);

            if let Some(share) = versions.get(NO_BREAKDOWN_KEY).copied() {
                if versions.len() == 1 && no_version_tracking.insert(browser.clone()) {
                    debug!("{} has no version tracking (first seen in {})", browser, region);
                }
                versions = rekey_catch_all(versions, share, browser, region, &global)?;
            }

            rebuilt.insert(browser.clone(), versions);
        }

        normalized.insert_region(region, rebuilt);
    }

    Ok(NormalizedUsage {
        model: normalized,
        no_version_tracking,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn normalize_region(usage: &RegionUsage) -> RegionUsage {
    usage
        .iter()
        .map(|(browser, versions)| (browser.clone(), normalize_versions(versions)))
        .collect()
}

/// Move the `"0"` share onto the browser's highest global version.
fn rekey_catch_all(
    versions: VersionUsage,
    share: f64,
    browser: &str,
    region: &str,
    global: &RegionUsage,
) -> Result<VersionUsage> {
    let max_global = match global.get(browser) {
        Some(global_versions) => max_version_key(global_versions.keys().map(String::as_str))?,
        None => None,
    };

    let Some(max_global) = max_global else {
        warn!(
            "{} in {} has only a catch-all version and no global versions to map it to",
            browser, region
        );
        return Ok(versions);
    };

    let mut rekeyed: VersionUsage = versions
        .into_iter()
        .filter(|(key, _)| key != NO_BREAKDOWN_KEY)
        .collect();
    *rekeyed.entry(max_global.to_string()).or_insert(0.0) += share;
    Ok(rekeyed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
