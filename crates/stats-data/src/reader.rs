//! Dataset loading for browser-stats.
//!
//! Reads the global agents file and one usage file per configured region from
//! the data directory and assembles them into a [`UsageModel`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stats_core::error::{Result, StatsError};
use stats_core::models::{BrowserInfo, RegionUsage, UsageModel, VersionUsage};
use stats_core::settings::StatsConfig;
use tracing::debug;

/// File name of the global dataset inside the data directory.
pub const GLOBAL_DATA_FILE: &str = "data.json";

/// Raw per-version shares; `null` means no recorded usage.
type RawVersions = BTreeMap<String, Option<f64>>;

#[derive(Debug, Deserialize)]
struct GlobalFile {
    /// Kept as a JSON map so the dataset's browser order survives.
    agents: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AgentRecord {
    browser: String,
    #[serde(default)]
    usage_global: RawVersions,
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    data: BTreeMap<String, RawVersions>,
}

/// Browsers in dataset order plus the raw (not yet normalized) usage model.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub browsers: Vec<BrowserInfo>,
    pub model: UsageModel,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Path of a region's usage file inside `data_dir`.
pub fn region_file(data_dir: &Path, region: &str) -> PathBuf {
    data_dir.join(format!("{region}.json"))
}

/// Load the global file and every configured region's file.
///
/// All files must be present; a missing one is reported as
/// [`StatsError::MissingData`] before any normalization happens.
pub fn load_dataset(data_dir: &Path, config: &StatsConfig) -> Result<Dataset> {
    let global_path = data_dir.join(GLOBAL_DATA_FILE);
    let (browsers, global) = parse_global(&read_required(&global_path)?)?;

    let mut model = UsageModel::new(global);
    for region in &config.regions {
        let path = region_file(data_dir, region);
        let usage = parse_region(&read_required(&path)?)?;
        debug!("Loaded {} browsers for region {}", usage.len(), region);
        model.insert_region(region.clone(), usage);
    }

    debug!(
        "Loaded dataset with {} browsers across {} regions",
        browsers.len(),
        model.regions().len()
    );

    Ok(Dataset { browsers, model })
}

/// Parse the global dataset: `{"agents": {id: {"browser": .., "usage_global": {..}}}}`.
pub fn parse_global(json: &str) -> Result<(Vec<BrowserInfo>, RegionUsage)> {
    let file: GlobalFile = serde_json::from_str(json)?;

    let mut browsers = Vec::with_capacity(file.agents.len());
    let mut usage = RegionUsage::new();
    for (id, value) in file.agents {
        let agent: AgentRecord = serde_json::from_value(value)?;
        browsers.push(BrowserInfo {
            id: id.clone(),
            name: agent.browser,
        });
        usage.insert(id, into_version_usage(agent.usage_global));
    }

    Ok((browsers, usage))
}

/// Parse a region dataset: `{"data": {id: {version: share}}}`.
pub fn parse_region(json: &str) -> Result<RegionUsage> {
    let file: RegionFile = serde_json::from_str(json)?;
    Ok(file
        .data
        .into_iter()
        .map(|(browser, versions)| (browser, into_version_usage(versions)))
        .collect())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn into_version_usage(raw: RawVersions) -> VersionUsage {
    raw.into_iter()
        .map(|(version, share)| (version, share.unwrap_or(0.0)))
        .collect()
}

fn read_required(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StatsError::MissingData {
                path: path.to_path_buf(),
            }
        } else {
            StatsError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
