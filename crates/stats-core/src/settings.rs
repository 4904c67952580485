use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::models::GLOBAL_REGION;
use crate::version::Version;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Display browser support stats
#[derive(Parser, Debug, Clone)]
#[command(
    name = "browser-stats",
    about = "Display browser support stats per region",
    version
)]
pub struct Settings {
    /// Download fresh usage data before reporting
    #[arg(long)]
    pub download: bool,

    /// Enable debug logging and cross-region consistency checks
    #[arg(long)]
    pub debug: bool,

    /// Region whose usage decides the browser order
    #[arg(long, default_value = GLOBAL_REGION)]
    pub sort_region: String,

    /// Directory holding data.json and the per-region files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Region list and support policy file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Colour output
    #[arg(long, default_value = "auto", value_parser = ["auto", "always", "never"])]
    pub color: String,

    /// Logging level
    #[arg(long, default_value = "warn", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Parse an explicit argument list and apply the `--debug` override.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "debug".to_string();
        }
        settings
    }
}

// ── SupportPolicy ──────────────────────────────────────────────────────────────

/// What the policy says about one browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// No policy entry; support is unknown.
    Unknown,
    /// Entry present with `null`; no version is supported.
    Never,
    /// Versions at or above this one are supported.
    Minimum(&'a str),
}

/// Browser id → minimum supported version (`None` = never supported).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportPolicy(BTreeMap<String, Option<String>>);

impl SupportPolicy {
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<&'static str>)>,
        K: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(str::to_string)))
                .collect(),
        )
    }

    pub fn requirement(&self, browser: &str) -> Requirement<'_> {
        match self.0.get(browser) {
            None => Requirement::Unknown,
            Some(None) => Requirement::Never,
            Some(Some(min)) => Requirement::Minimum(min.as_str()),
        }
    }

    pub fn contains(&self, browser: &str) -> bool {
        self.0.contains_key(browser)
    }

    /// Every concrete minimum must be a parseable version.
    pub fn validate(&self) -> Result<()> {
        for (browser, min) in &self.0 {
            if let Some(min) = min {
                Version::parse(min).map_err(|_| {
                    StatsError::Config(format!(
                        "minimum version {min:?} for {browser} is not a valid version"
                    ))
                })?;
            }
        }
        Ok(())
    }
}

// ── StatsConfig ────────────────────────────────────────────────────────────────

/// Region list and support policy for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Real regions to report, in column order. Never includes `global`.
    pub regions: Vec<String>,
    /// Minimum supported version per browser.
    #[serde(default)]
    pub supported: SupportPolicy,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            regions: vec!["AU".to_string(), "US".to_string(), "GB".to_string()],
            supported: SupportPolicy::from_entries([
                ("ie", None),
                ("ie_mob", None),
                ("op_mini", None),
                ("bb", None),
                ("edge", Some("79")),
                ("firefox", Some("78")),
                ("chrome", Some("80")),
                ("safari", Some("13.1")),
                ("opera", Some("67")),
                ("ios_saf", Some("13.4")),
                ("android", Some("80")),
                ("and_chr", Some("80")),
                ("and_ff", Some("79")),
                ("op_mob", Some("57")),
                ("samsung", Some("13.0")),
            ]),
        }
    }
}

impl StatsConfig {
    /// Path of the per-user config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("browser-stats").join("config.json"))
    }

    /// Resolve the config: an explicit path must exist; otherwise the
    /// per-user file is used when present, else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using built-in defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| StatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StatsConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(
            "Loaded config from {} ({} regions)",
            path.display(),
            config.regions.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.trim().is_empty() {
                return Err(StatsError::Config("empty region id".to_string()));
            }
            if region == GLOBAL_REGION {
                return Err(StatsError::Config(format!(
                    "{GLOBAL_REGION:?} is implicit and must not be listed"
                )));
            }
            if !seen.insert(region.as_str()) {
                return Err(StatsError::Config(format!("duplicate region {region:?}")));
            }
        }
        self.supported.validate()
    }

    /// `global` followed by the configured regions.
    pub fn all_regions(&self) -> Vec<&str> {
        std::iter::once(GLOBAL_REGION)
            .chain(self.regions.iter().map(String::as_str))
            .collect()
    }

    /// Fail unless `region` is `global` or configured.
    pub fn check_region(&self, region: &str) -> Result<()> {
        if region == GLOBAL_REGION || self.regions.iter().any(|r| r == region) {
            Ok(())
        } else {
            Err(StatsError::UnknownRegion(region.to_string()))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
