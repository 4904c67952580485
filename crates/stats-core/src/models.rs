use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of the synthetic worldwide region.
pub const GLOBAL_REGION: &str = "global";

/// Version key → usage percentage for one browser in one region.
///
/// `null` percentages in the source data are stored as `0.0`.
pub type VersionUsage = BTreeMap<String, f64>;

/// Browser id → per-version usage for one region.
pub type RegionUsage = BTreeMap<String, VersionUsage>;

/// Browsers whose regional data carried only a catch-all `"0"` version.
pub type NoVersionTracking = BTreeSet<String>;

/// A tracked browser as listed in the global dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    /// Short id, e.g. `"ios_saf"`.
    pub id: String,
    /// Display name, e.g. `"Safari on iOS"`.
    pub name: String,
}

// ── UsageModel ─────────────────────────────────────────────────────────────────

/// Usage percentages per region, per browser, per version.
///
/// The global region is always present and always first; real regions follow
/// in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageModel {
    order: Vec<String>,
    usage: BTreeMap<String, RegionUsage>,
}

impl UsageModel {
    /// Create a model holding only the global region.
    pub fn new(global: RegionUsage) -> Self {
        let mut usage = BTreeMap::new();
        usage.insert(GLOBAL_REGION.to_string(), global);
        Self {
            order: vec![GLOBAL_REGION.to_string()],
            usage,
        }
    }

    /// Add or replace a region's usage. New regions are appended to the order.
    pub fn insert_region(&mut self, region: impl Into<String>, usage: RegionUsage) {
        let region = region.into();
        if !self.usage.contains_key(&region) {
            self.order.push(region.clone());
        }
        self.usage.insert(region, usage);
    }

    /// All region ids, global first.
    pub fn regions(&self) -> &[String] {
        &self.order
    }

    /// Region ids excluding global.
    pub fn real_regions(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|r| *r != GLOBAL_REGION)
    }

    pub fn region(&self, region: &str) -> Option<&RegionUsage> {
        self.usage.get(region)
    }

    pub fn global(&self) -> &RegionUsage {
        // Inserted by every constructor and never removed.
        &self.usage[GLOBAL_REGION]
    }

    /// `(region, usage)` pairs in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionUsage)> {
        self.order
            .iter()
            .filter_map(|r| self.usage.get(r).map(|u| (r.as_str(), u)))
    }
}

// ── Aggregates ─────────────────────────────────────────────────────────────────

/// Support status of one browser in one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportStatus {
    /// Browser has a minimum version; carries the usage at or above it.
    Supported(f64),
    /// Policy marks the browser as never supported.
    NotSupported,
    /// Browser has no policy entry.
    Unknown,
}

impl SupportStatus {
    /// The supported usage share, `0.0` for never-supported, `None` for unknown.
    pub fn supported_usage(&self) -> Option<f64> {
        match self {
            SupportStatus::Supported(pct) => Some(*pct),
            SupportStatus::NotSupported => Some(0.0),
            SupportStatus::Unknown => None,
        }
    }
}

/// Usage and support figures for one browser in one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserFigures {
    /// Sum of all version shares.
    pub usage: f64,
    pub support: SupportStatus,
}

/// Supported / not-supported / unknown split for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTotals {
    pub region: String,
    pub supported: f64,
    pub not_supported: f64,
    /// Residual `100 - supported - not_supported`; may leave `[0, 100]`
    /// slightly because source shares are rounded.
    pub unknown: f64,
    pub browsers: BTreeMap<String, BrowserFigures>,
}

impl RegionTotals {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            supported: 0.0,
            not_supported: 0.0,
            unknown: 100.0,
            browsers: BTreeMap::new(),
        }
    }

    /// Recompute the unknown residual from the two summed buckets.
    pub fn finalize(&mut self) {
        self.unknown = 100.0 - self.supported - self.not_supported;
    }

    pub fn browser(&self, browser: &str) -> Option<&BrowserFigures> {
        self.browsers.get(browser)
    }

    /// Total usage of `browser`, `0.0` when the region has no data for it.
    pub fn usage_of(&self, browser: &str) -> f64 {
        self.browsers.get(browser).map_or(0.0, |f| f.usage)
    }
}

/// Aggregation result for every region, in model region order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTotals {
    pub regions: Vec<RegionTotals>,
}

impl AggregateTotals {
    pub fn region(&self, region: &str) -> Option<&RegionTotals> {
        self.regions.iter().find(|r| r.region == region)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
