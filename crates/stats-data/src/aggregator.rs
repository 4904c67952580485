//! Support aggregation over the normalized usage model.
//!
//! For every region, each browser's version shares are split into supported
//! and not-supported buckets according to the [`SupportPolicy`]. Browsers
//! without a policy entry land in the unknown bucket, which is the residual
//! `100 - supported - not_supported` rather than a direct sum.

use stats_core::error::{Result, StatsError};
use stats_core::models::{
    AggregateTotals, BrowserFigures, BrowserInfo, RegionTotals, RegionUsage, SupportStatus,
    UsageModel, VersionUsage,
};
use stats_core::settings::{Requirement, SupportPolicy};
use stats_core::version::Version;
use tracing::debug;

// ── SupportAggregator ─────────────────────────────────────────────────────────

/// Folds usage against a support policy.
pub struct SupportAggregator<'a> {
    policy: &'a SupportPolicy,
}

impl<'a> SupportAggregator<'a> {
    pub fn new(policy: &'a SupportPolicy) -> Self {
        Self { policy }
    }

    /// Aggregate every region of `model`, in model order.
    ///
    /// Fails on the first version key that cannot be compared against a
    /// policy minimum.
    pub fn aggregate(&self, model: &UsageModel) -> Result<AggregateTotals> {
        let regions = model
            .iter()
            .map(|(region, usage)| self.aggregate_region(region, usage))
            .collect::<Result<Vec<_>>>()?;
        Ok(AggregateTotals { regions })
    }

    /// Aggregate a single region.
    pub fn aggregate_region(&self, region: &str, usage: &RegionUsage) -> Result<RegionTotals> {
        let mut totals = RegionTotals::new(region);

        for (browser, versions) in usage {
            let figures = self.browser_figures(browser, versions, &mut totals)?;
            totals.browsers.insert(browser.clone(), figures);
        }

        totals.finalize();
        debug!(
            "{}: supported {:.2}, not supported {:.2}, unknown {:.2}",
            region, totals.supported, totals.not_supported, totals.unknown
        );
        Ok(totals)
    }

    fn browser_figures(
        &self,
        browser: &str,
        versions: &VersionUsage,
        totals: &mut RegionTotals,
    ) -> Result<BrowserFigures> {
        let usage: f64 = versions.values().sum();

        let support = match self.policy.requirement(browser) {
            Requirement::Unknown => SupportStatus::Unknown,
            Requirement::Never => {
                totals.not_supported += usage;
                SupportStatus::NotSupported
            }
            Requirement::Minimum(min) => {
                let min = Version::parse(min)?;
                let mut supported = 0.0;
                for (version, share) in versions {
                    if Version::parse(version)? >= min {
                        supported += share;
                        totals.supported += share;
                    } else {
                        totals.not_supported += share;
                    }
                }
                SupportStatus::Supported(supported)
            }
        };

        Ok(BrowserFigures { usage, support })
    }
}

// ── Ordering ──────────────────────────────────────────────────────────────────

/// Order `browsers` by descending total usage in `sort_region`.
///
/// The sort is stable, so ties keep dataset order. Browsers the region has no
/// data for count as zero usage.
pub fn browsers_by_usage<'b>(
    browsers: &'b [BrowserInfo],
    totals: &AggregateTotals,
    sort_region: &str,
) -> Result<Vec<&'b BrowserInfo>> {
    let region = totals
        .region(sort_region)
        .ok_or_else(|| StatsError::UnknownRegion(sort_region.to_string()))?;

    let mut ordered: Vec<&BrowserInfo> = browsers.iter().collect();
    ordered.sort_by(|a, b| region.usage_of(&b.id).total_cmp(&region.usage_of(&a.id)));
    Ok(ordered)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
