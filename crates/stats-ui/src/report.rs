//! Browser support report.
//!
//! [`build_report`] turns aggregated totals into labelled rows;
//! [`render_report`] writes them as a fixed-width table. One usage/support
//! column pair is printed per region, followed by the region totals.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use stats_core::formatting::format_percent;
use stats_core::models::{
    AggregateTotals, BrowserFigures, BrowserInfo, NoVersionTracking, RegionTotals, SupportStatus,
    GLOBAL_REGION,
};
use stats_core::settings::{Requirement, SupportPolicy};

use crate::themes::{Theme, Tone};

/// Display width of the label column.
pub const LABEL_WIDTH: usize = 28;
/// Display width of each figure column.
pub const FIGURE_WIDTH: usize = 8;

pub const NO_VERSION_TRACKING_NOTE: &str =
    "* No version tracking (any kind of support will match all versions)";

const PERCENT_DECIMALS: u32 = 1;

/// One browser line: label plus per-region figures (`None` = no data).
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserRow {
    pub label: String,
    pub tone: Tone,
    pub figures: Vec<Option<BrowserFigures>>,
}

/// One line of the totals section, one value per region.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsRow {
    pub label: &'static str,
    pub tone: Tone,
    pub values: Vec<f64>,
}

/// Everything needed to print the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Column headings, `Global` first.
    pub columns: Vec<String>,
    pub browsers: Vec<BrowserRow>,
    pub totals: Vec<TotalsRow>,
    /// Print the no-version-tracking footnote.
    pub footnote: bool,
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Label and tone for a browser: display name, `*` when it lacks version
/// tracking, then the policy requirement.
pub fn browser_label(
    browser: &BrowserInfo,
    policy: &SupportPolicy,
    no_version_tracking: &NoVersionTracking,
) -> (String, Tone) {
    let mut label = browser.name.clone();
    if no_version_tracking.contains(&browser.id) {
        label.push('*');
    }
    let tone = match policy.requirement(&browser.id) {
        Requirement::Unknown => Tone::Unknown,
        Requirement::Never => {
            label.push_str(" (never)");
            Tone::NotSupported
        }
        Requirement::Minimum(min) => {
            label.push_str(&format!(" ({min}+)"));
            Tone::Supported
        }
    };
    (label, tone)
}

/// Assemble the report rows. `ordered` fixes the browser row order.
pub fn build_report(
    ordered: &[&BrowserInfo],
    totals: &AggregateTotals,
    policy: &SupportPolicy,
    no_version_tracking: &NoVersionTracking,
) -> Report {
    let columns = totals
        .regions
        .iter()
        .map(|r| {
            if r.region == GLOBAL_REGION {
                "Global".to_string()
            } else {
                r.region.clone()
            }
        })
        .collect();

    let browsers = ordered
        .iter()
        .map(|browser| {
            let (label, tone) = browser_label(browser, policy, no_version_tracking);
            let figures = totals
                .regions
                .iter()
                .map(|r| r.browser(&browser.id).copied())
                .collect();
            BrowserRow {
                label,
                tone,
                figures,
            }
        })
        .collect();

    let column = |f: fn(&RegionTotals) -> f64| -> Vec<f64> {
        totals.regions.iter().map(f).collect()
    };
    let totals_rows = vec![
        TotalsRow {
            label: "Supported",
            tone: Tone::Supported,
            values: column(|r| r.supported),
        },
        TotalsRow {
            label: "Unknown",
            tone: Tone::Unknown,
            values: column(|r| r.unknown),
        },
        TotalsRow {
            label: "Not supported",
            tone: Tone::NotSupported,
            values: column(|r| r.not_supported),
        },
    ];

    Report {
        columns,
        browsers,
        totals: totals_rows,
        footnote: !no_version_tracking.is_empty(),
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Write the report to `out`.
pub fn render_report<W: Write>(out: &mut W, report: &Report, theme: &Theme) -> io::Result<()> {
    let blank = " ".repeat(FIGURE_WIDTH);

    let mut header = pad_right("Region", LABEL_WIDTH);
    for column in &report.columns {
        header.push_str(&pad_left(column, FIGURE_WIDTH));
        header.push_str(&blank);
    }
    writeln!(out, "{}", header.trim_end())?;
    writeln!(out)?;

    writeln!(out, "Browser (total, support)")?;
    for row in &report.browsers {
        let mut line = theme.paint(&pad_right(&row.label, LABEL_WIDTH), row.tone);
        for figures in &row.figures {
            let (usage, support) = figure_cells(figures.as_ref());
            line.push_str(&pad_left(&usage, FIGURE_WIDTH));
            line.push_str(&theme.paint(&pad_left(&support, FIGURE_WIDTH), row.tone));
        }
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;

    writeln!(out, "Total")?;
    for row in &report.totals {
        let mut line = pad_right(row.label, LABEL_WIDTH);
        for value in &row.values {
            line.push_str(&blank);
            line.push_str(&pad_left(
                &format_percent(*value, PERCENT_DECIMALS),
                FIGURE_WIDTH,
            ));
        }
        writeln!(out, "{}", theme.paint(&line, row.tone))?;
    }

    if report.footnote {
        writeln!(out)?;
        writeln!(out, "{NO_VERSION_TRACKING_NOTE}")?;
    }

    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Usage and support cell text for one region.
fn figure_cells(figures: Option<&BrowserFigures>) -> (String, String) {
    let Some(figures) = figures else {
        return ("-".to_string(), "-".to_string());
    };
    let usage = format_percent(figures.usage, PERCENT_DECIMALS);
    let support = match figures.support {
        SupportStatus::Supported(pct) => format_percent(pct, PERCENT_DECIMALS),
        SupportStatus::NotSupported => format_percent(0.0, PERCENT_DECIMALS),
        SupportStatus::Unknown => "?".to_string(),
    };
    (usage, support)
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{text}", " ".repeat(fill))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str) -> BrowserInfo {
        BrowserInfo {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn policy() -> SupportPolicy {
        SupportPolicy::from_entries([("chrome", Some("80")), ("ie", None)])
    }

    fn totals() -> AggregateTotals {
        let mut global = RegionTotals::new("global");
        global.supported = 60.0;
        global.not_supported = 1.0;
        global.browsers.insert(
            "chrome".to_string(),
            BrowserFigures {
                usage: 62.0,
                support: SupportStatus::Supported(60.0),
            },
        );
        global.browsers.insert(
            "ie".to_string(),
            BrowserFigures {
                usage: 1.0,
                support: SupportStatus::NotSupported,
            },
        );
        global.browsers.insert(
            "and_uc".to_string(),
            BrowserFigures {
                usage: 1.5,
                support: SupportStatus::Unknown,
            },
        );
        global.finalize();

        let mut au = RegionTotals::new("AU");
        au.supported = 50.0;
        au.browsers.insert(
            "chrome".to_string(),
            BrowserFigures {
                usage: 52.0,
                support: SupportStatus::Supported(50.0),
            },
        );
        au.finalize();

        AggregateTotals {
            regions: vec![global, au],
        }
    }

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        render_report(&mut buf, report, &Theme::plain()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── browser_label ─────────────────────────────────────────────────────────

    #[test]
    fn test_browser_label_variants() {
        let nvt = NoVersionTracking::new();
        assert_eq!(
            browser_label(&info("chrome", "Chrome"), &policy(), &nvt),
            ("Chrome (80+)".to_string(), Tone::Supported)
        );
        assert_eq!(
            browser_label(&info("ie", "IE"), &policy(), &nvt),
            ("IE (never)".to_string(), Tone::NotSupported)
        );
        assert_eq!(
            browser_label(&info("kaios", "KaiOS Browser"), &policy(), &nvt),
            ("KaiOS Browser".to_string(), Tone::Unknown)
        );
    }

    #[test]
    fn test_browser_label_marks_no_version_tracking() {
        let nvt: NoVersionTracking = ["chrome".to_string()].into_iter().collect();
        let (label, _) = browser_label(&info("chrome", "Chrome"), &policy(), &nvt);
        assert_eq!(label, "Chrome* (80+)");
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_report_rows_follow_given_order() {
        let browsers = [info("ie", "IE"), info("chrome", "Chrome")];
        let ordered: Vec<&BrowserInfo> = browsers.iter().collect();
        let report = build_report(&ordered, &totals(), &policy(), &NoVersionTracking::new());

        assert_eq!(report.columns, vec!["Global", "AU"]);
        let labels: Vec<&str> = report.browsers.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["IE (never)", "Chrome (80+)"]);
        // IE has no AU data.
        assert!(report.browsers[0].figures[1].is_none());
        assert!(!report.footnote);
    }

    #[test]
    fn test_build_report_totals_rows() {
        let report = build_report(&[], &totals(), &policy(), &NoVersionTracking::new());
        let labels: Vec<&str> = report.totals.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Supported", "Unknown", "Not supported"]);
        assert_eq!(report.totals[0].values, vec![60.0, 50.0]);
        assert_eq!(report.totals[2].values, vec![1.0, 0.0]);
    }

    // ── render_report ─────────────────────────────────────────────────────────

    #[test]
    fn test_render_layout() {
        let browsers = [
            info("chrome", "Chrome"),
            info("and_uc", "UC Browser"),
            info("ie", "IE"),
        ];
        let ordered: Vec<&BrowserInfo> = browsers.iter().collect();
        let nvt: NoVersionTracking = ["and_uc".to_string()].into_iter().collect();
        let output = render(&build_report(&ordered, &totals(), &policy(), &nvt));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            format!("{:<28}{:>8}{:8}{:>8}", "Region", "Global", "", "AU")
        );
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Browser (total, support)");
        assert_eq!(
            lines[3],
            format!(
                "{:<28}{:>8}{:>8}{:>8}{:>8}",
                "Chrome (80+)", "62.0%", "60.0%", "52.0%", "50.0%"
            )
        );
        assert_eq!(
            lines[4],
            format!("{:<28}{:>8}{:>8}{:>8}{:>8}", "UC Browser*", "1.5%", "?", "-", "-")
        );
        assert_eq!(
            lines[5],
            format!("{:<28}{:>8}{:>8}{:>8}{:>8}", "IE (never)", "1.0%", "0.0%", "-", "-")
        );
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Total");
        assert_eq!(
            lines[8],
            format!("{:<28}{:8}{:>8}{:8}{:>8}", "Supported", "", "60.0%", "", "50.0%")
        );
        assert_eq!(
            lines[9],
            format!("{:<28}{:8}{:>8}{:8}{:>8}", "Unknown", "", "39.0%", "", "50.0%")
        );
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], NO_VERSION_TRACKING_NOTE);
    }

    #[test]
    fn test_render_without_footnote() {
        let output = render(&build_report(&[], &totals(), &policy(), &NoVersionTracking::new()));
        assert!(!output.contains(NO_VERSION_TRACKING_NOTE));
        assert!(output.trim_end().ends_with("0.0%"));
    }

    #[test]
    fn test_render_colored_keeps_text() {
        let browsers = [info("chrome", "Chrome")];
        let ordered: Vec<&BrowserInfo> = browsers.iter().collect();
        let report = build_report(&ordered, &totals(), &policy(), &NoVersionTracking::new());

        let mut buf = Vec::new();
        render_report(&mut buf, &report, &Theme::colored()).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("Chrome (80+)"));
        assert!(output.contains("Not supported"));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad_right("Ωmega", 7), "Ωmega  ");
        assert_eq!(pad_left("60.0%", 8), "   60.0%");
        assert_eq!(pad_right("a very long browser name here", 4), "a very long browser name here");
    }
}
