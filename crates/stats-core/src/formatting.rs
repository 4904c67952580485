/// Format a usage share as a percentage with a fixed number of decimals.
///
/// Values that round to zero are printed without a sign, so a residual of
/// `-0.00001` shows as `0.0%` rather than `-0.0%`.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_percent;
///
/// assert_eq!(format_percent(12.345, 1), "12.3%");
/// assert_eq!(format_percent(0.0, 1), "0.0%");
/// assert_eq!(format_percent(-0.00001, 1), "0.0%");
/// assert_eq!(format_percent(100.0, 0), "100%");
/// ```
pub fn format_percent(value: f64, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    // Normalise negative zero.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.prec$}%", rounded, prec = decimals as usize)
}

/// Round `value` to `decimals` places.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::round_to;
///
/// assert!((round_to(1.26, 1) - 1.3).abs() < 1e-9);
/// assert!((round_to(-2.44, 1) + 2.4).abs() < 1e-9);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Absolute tolerance used when comparing summed percentages.
pub const PERCENT_TOLERANCE: f64 = 1e-6;

/// `true` when two percentage figures agree within [`PERCENT_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= PERCENT_TOLERANCE
}

// ── Tests ──────────────────────────────────────────────────────────────────────
