//! Number and period formatting for chart labels and log summaries.

use chrono::NaiveDate;

/// Format a revenue amount with two decimals and thousands separators.
///
/// The amount is rounded to whole cents, halves away from zero.
///
/// ```
/// use sales_core::formatting::format_revenue;
///
/// assert_eq!(format_revenue(1234.56), "1,234.56");
/// assert_eq!(format_revenue(1_234_567.0), "1,234,567.00");
/// assert_eq!(format_revenue(0.0), "0.00");
/// assert_eq!(format_revenue(-9876.5), "-9,876.50");
/// ```
pub fn format_revenue(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, group_digits(cents / 100), cents % 100)
}

/// Short magnitude form for axis ticks and bar captions.
///
/// ```
/// use sales_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(1_500.0), "1.5k");
/// assert_eq!(format_compact(2_340_000.0), "2.3M");
/// assert_eq!(format_compact(7_000_000_000.0), "7.0B");
/// ```
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e9 {
        format!("{}{:.1}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}{:.1}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}{:.1}k", sign, abs / 1e3)
    } else {
        format!("{}{:.0}", sign, abs)
    }
}

/// Month label in `Mon/YYYY` form, e.g. `Jan/2024`.
///
/// ```
/// use chrono::NaiveDate;
/// use sales_core::formatting::format_month;
///
/// let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// assert_eq!(format_month(d), "Feb/2024");
/// ```
pub fn format_month(month_start: NaiveDate) -> String {
    month_start.format("%b/%Y").to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `1234567` -> `"1,234,567"`.
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
