//! Date parsing and calendar helpers for sales timestamps.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

/// Date-time patterns tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only patterns; the time component becomes midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a sales date string into a naive date-time.
///
/// Handles:
/// * RFC 3339 with `Z` or a fixed offset; the wall-clock time in that offset
///   is kept.
/// * ISO 8601 date-times with `T` or a space separator, with or without
///   seconds and fractional seconds.
/// * Date-only `YYYY-MM-DD`, `YYYY/MM/DD` and `MM/DD/YYYY`.
///
/// Returns `None` for blank or unrecognised input.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// Truncate a date-time to the first day of its calendar month.
///
/// ```
/// use chrono::{NaiveDate, NaiveDateTime};
/// use sales_core::dates::month_start;
///
/// let dt = NaiveDateTime::parse_from_str("2024-01-31 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(month_start(dt), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// ```
pub fn month_start(dt: NaiveDateTime) -> NaiveDate {
    let date = dt.date();
    date - Duration::days(i64::from(date.day0()))
}

/// Whole calendar months from `from` to `to`, ignoring the day.
///
/// ```
/// use chrono::NaiveDate;
/// use sales_core::dates::months_between;
///
/// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let may = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// assert_eq!(months_between(jan, may), 4);
/// assert_eq!(months_between(may, jan), -4);
/// ```
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month0() as i32 - from.month0() as i32
}

/// `date` moved forward by `months` calendar months, `None` on overflow.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// `true` when the time component is exactly midnight.
pub fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 && dt.nanosecond() == 0
}

/// Render a date-time as `YYYY-MM-DD` when `date_only`, else
/// `YYYY-MM-DD HH:MM:SS`.
pub fn format_datetime(dt: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // ── parse_datetime ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_datetime("2024-01-15"),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_iso_datetime_space() {
        assert_eq!(
            parse_datetime("2024-01-15 10:30:00"),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_iso_datetime_t_without_seconds() {
        assert_eq!(
            parse_datetime("2024-01-15T10:30"),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        assert_eq!(
            parse_datetime("2024-03-31T22:00:00-03:00"),
            Some(ymd_hms(2024, 3, 31, 22, 0, 0))
        );
        assert_eq!(
            parse_datetime("2024-03-31T22:00:00Z"),
            Some(ymd_hms(2024, 3, 31, 22, 0, 0))
        );
    }

    #[test]
    fn test_parse_month_first_slashes() {
        assert_eq!(
            parse_datetime("02/01/2024"),
            Some(ymd_hms(2024, 2, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            parse_datetime("  2024-01-15 "),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("2024-13-45").is_none());
    }

    #[test]
    fn test_parse_leap_day() {
        assert_eq!(
            parse_datetime("2024-02-29"),
            Some(ymd_hms(2024, 2, 29, 0, 0, 0))
        );
        assert!(parse_datetime("2023-02-29").is_none());
    }

    // ── month_start ───────────────────────────────────────────────────────────

    #[test]
    fn test_month_start_last_day_groups_with_first() {
        let first = month_start(ymd_hms(2024, 1, 1, 0, 0, 0));
        let last = month_start(ymd_hms(2024, 1, 31, 23, 59, 59));
        assert_eq!(first, last);
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_month_start_leap_february() {
        assert_eq!(
            month_start(ymd_hms(2024, 2, 29, 12, 0, 0)),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_months_between_across_years() {
        let nov = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(months_between(nov, feb), 3);
        assert_eq!(months_between(nov, nov), 0);
        assert_eq!(add_months(nov, 3), Some(feb));
    }

    // ── format_datetime ───────────────────────────────────────────────────────

    #[test]
    fn test_format_datetime_modes() {
        let dt = ymd_hms(2024, 1, 15, 8, 5, 0);
        assert_eq!(format_datetime(&dt, true), "2024-01-15");
        assert_eq!(format_datetime(&dt, false), "2024-01-15 08:05:00");
    }

    #[test]
    fn test_is_midnight() {
        assert!(is_midnight(&ymd_hms(2024, 1, 15, 0, 0, 0)));
        assert!(!is_midnight(&ymd_hms(2024, 1, 15, 0, 0, 1)));
    }
}
