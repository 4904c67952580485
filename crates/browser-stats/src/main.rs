mod bootstrap;

use std::io::Write;

use anyhow::Result;
use stats_core::settings::{Settings, StatsConfig};
use stats_data::aggregator::{browsers_by_usage, SupportAggregator};
use stats_data::checker::check_consistency;
use stats_data::fetch::Downloader;
use stats_data::normalizer::normalize;
use stats_data::reader::load_dataset;
use stats_ui::report::{build_report, render_report};
use stats_ui::themes::{ColorMode, Theme};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    tracing::info!("browser-stats v{} starting", env!("CARGO_PKG_VERSION"));

    let config = StatsConfig::load(settings.config.as_deref())?;

    if settings.download {
        Downloader::new()?.download_all(&settings.data_dir, &config.regions)?;
    }

    let theme = Theme::for_mode(ColorMode::from_setting(&settings.color));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&settings, &config, &theme, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Load, normalize, aggregate and print the report for already-downloaded data.
fn run<W: Write>(
    settings: &Settings,
    config: &StatsConfig,
    theme: &Theme,
    out: &mut W,
) -> Result<()> {
    config.check_region(&settings.sort_region)?;

    let dataset = load_dataset(&settings.data_dir, config)?;
    let normalized = normalize(&dataset.model)?;

    if settings.debug {
        let mismatches = check_consistency(&normalized.model);
        tracing::debug!("Consistency check found {} mismatches", mismatches.len());
    }

    let totals = SupportAggregator::new(&config.supported).aggregate(&normalized.model)?;
    let ordered = browsers_by_usage(&dataset.browsers, &totals, &settings.sort_region)?;

    let report = build_report(
        &ordered,
        &totals,
        &config.supported,
        &normalized.no_version_tracking,
    );
    render_report(out, &report, theme)?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::error::StatsError;
    use stats_core::settings::SupportPolicy;
    use tempfile::TempDir;

    fn write_data(tmp: &TempDir) {
        std::fs::write(
            tmp.path().join("data.json"),
            r#"{"agents": {
                "ie": {"browser": "IE", "usage_global": {"11": 1.0}},
                "chrome": {"browser": "Chrome", "usage_global": {"79": 2.0, "120": 50.0}},
                "and_uc": {"browser": "UC Browser", "usage_global": {"15.5": 1.5}}
            }}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("NZ.json"),
            r#"{"data": {
                "ie": {"11": 0.5},
                "chrome": {"79": 1.0, "120": 60.0},
                "and_uc": {"0": 2.0}
            }}"#,
        )
        .unwrap();
    }

    fn config() -> StatsConfig {
        StatsConfig {
            regions: vec!["NZ".to_string()],
            supported: SupportPolicy::from_entries([("ie", None), ("chrome", Some("80"))]),
        }
    }

    fn settings(tmp: &TempDir, extra: &[&str]) -> Settings {
        let data_dir = tmp.path().to_string_lossy().to_string();
        let mut args = vec!["browser-stats", "--data-dir", data_dir.as_str()];
        args.extend_from_slice(extra);
        Settings::load_from_args(args)
    }

    fn run_to_string(settings: &Settings, config: &StatsConfig) -> Result<String> {
        let mut buf = Vec::new();
        run(settings, config, &Theme::plain(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_run_prints_report() {
        let tmp = TempDir::new().expect("tempdir");
        write_data(&tmp);

        let output = run_to_string(&settings(&tmp, &[]), &config()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Region"));
        assert!(lines[0].contains("Global"));
        assert!(lines[0].contains("NZ"));
        assert!(lines[3].starts_with("Chrome (80+)"));
        assert!(lines[4].starts_with("UC Browser*"));
        assert!(lines[5].starts_with("IE (never)"));
        assert!(output.contains("No version tracking"));
    }

    #[test]
    fn test_run_sorts_by_requested_region() {
        let tmp = TempDir::new().expect("tempdir");
        write_data(&tmp);

        let output = run_to_string(&settings(&tmp, &["--sort-region", "NZ"]), &config()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        // NZ: chrome 61.0, and_uc 2.0, ie 0.5
        assert!(lines[3].starts_with("Chrome"));
        assert!(lines[4].starts_with("UC Browser"));
        assert!(lines[5].starts_with("IE"));
    }

    #[test]
    fn test_run_with_debug_checks_consistency() {
        let tmp = TempDir::new().expect("tempdir");
        write_data(&tmp);

        let output = run_to_string(&settings(&tmp, &["--debug"]), &config()).unwrap();
        assert!(output.contains("Total"));
    }

    #[test]
    fn test_run_rejects_unknown_sort_region() {
        let tmp = TempDir::new().expect("tempdir");
        write_data(&tmp);

        let err = run_to_string(&settings(&tmp, &["--sort-region", "XX"]), &config()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StatsError>(),
            Some(StatsError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_run_missing_data_mentions_download() {
        let tmp = TempDir::new().expect("tempdir");

        let err = run_to_string(&settings(&tmp, &[]), &config()).unwrap_err();
        assert!(err.to_string().contains("--download"));
    }
}
