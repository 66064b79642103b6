//! Field-level parsing for raw input cells.
//!
//! Each parser returns a [`FieldParse`] so callers can tell a parsed value
//! apart from a missing cell and from a cell that was present but
//! unusable. The loader stores only the value, but counts the other two.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Outcome of parsing a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldParse<T> {
    /// The cell held a usable value.
    Parsed(T),
    /// The cell was empty or a null marker.
    Missing,
    /// The cell had content that could not be interpreted.
    Malformed,
}

impl<T> FieldParse<T> {
    /// Returns the parsed value, if any.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Missing | Self::Malformed => None,
        }
    }

    /// Returns `true` for [`FieldParse::Malformed`].
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// Returns `true` if a cell counts as missing: empty after trimming, or a
/// literal null marker left behind by upstream exports.
#[must_use]
pub fn is_missing_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
}

/// Returns `true` if a cell parses as a finite number equal to zero.
#[must_use]
pub fn is_zero_cell(cell: &str) -> bool {
    cell.trim()
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v == 0.0)
}

/// Naive formats tried in order after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Offset-bearing formats that RFC 3339 parsing rejects (`+0000` offsets,
/// space separator).
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses an incident timestamp.
///
/// Accepts ISO 8601 / RFC 3339 (with or without offset and fractional
/// seconds), `YYYY-MM-DD HH:MM:SS`, and the `MM/DD/YYYY hh:mm:ss AM` export
/// format. Offset-bearing values keep their local wall-clock time. A bare
/// date is taken as midnight.
#[must_use]
pub fn parse_timestamp(cell: &str) -> FieldParse<NaiveDateTime> {
    if is_missing_cell(cell) {
        return FieldParse::Missing;
    }
    let s = cell.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return FieldParse::Parsed(dt.naive_local());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return FieldParse::Parsed(dt.naive_local());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return FieldParse::Parsed(naive);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format)
            && let Some(midnight) = date.and_hms_opt(0, 0, 0)
        {
            return FieldParse::Parsed(midnight);
        }
    }

    FieldParse::Malformed
}

/// Parses a loosely-typed boolean flag.
///
/// `true`, `t`, `yes`, `y`, `1` and `1.0` (any case) are true. Everything
/// else, including an empty cell, is false.
#[must_use]
pub fn parse_flag(cell: &str) -> bool {
    let lower = cell.trim().to_ascii_lowercase();
    matches!(lower.as_str(), "true" | "t" | "yes" | "y" | "1" | "1.0")
}

/// Parses an integer-coercible area identifier.
///
/// Float renderings such as `"11.0"` are truncated toward zero.
#[must_use]
pub fn parse_area_id(cell: &str) -> FieldParse<i64> {
    if is_missing_cell(cell) {
        return FieldParse::Missing;
    }
    let s = cell.trim();

    if let Ok(id) = s.parse::<i64>() {
        return FieldParse::Parsed(id);
    }
    match s.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        Ok(v) if v.is_finite() && v.abs() < i64::MAX as f64 => FieldParse::Parsed(v.trunc() as i64),
        _ => FieldParse::Malformed,
    }
}

/// Parses a coordinate component.
#[must_use]
pub fn parse_coordinate(cell: &str) -> FieldParse<f64> {
    if is_missing_cell(cell) {
        return FieldParse::Missing;
    }
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => FieldParse::Parsed(v),
        _ => FieldParse::Malformed,
    }
}

/// Returns the trimmed cell, or `None` if it is missing.
#[must_use]
pub fn parse_text(cell: &str) -> Option<String> {
    (!is_missing_cell(cell)).then(|| cell.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(cell: &str) -> Option<String> {
        parse_timestamp(cell)
            .value()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    #[test]
    fn parses_iso_timestamps() {
        assert_eq!(formatted("2024-01-15T14:30:00").unwrap(), "2024-01-15 14:30:00");
        assert_eq!(formatted("2024-01-15T14:30:00.000").unwrap(), "2024-01-15 14:30:00");
        assert_eq!(formatted("2024-01-15 14:30:00").unwrap(), "2024-01-15 14:30:00");
    }

    #[test]
    fn keeps_wall_clock_time_of_offset_timestamps() {
        assert_eq!(formatted("2024-01-15T23:10:00-06:00").unwrap(), "2024-01-15 23:10:00");
        assert_eq!(formatted("2024-01-15T23:10:00Z").unwrap(), "2024-01-15 23:10:00");
        assert_eq!(formatted("2024-01-15T23:10:00+0000").unwrap(), "2024-01-15 23:10:00");
    }

    #[test]
    fn parses_us_export_format() {
        assert_eq!(formatted("09/05/2023 11:45:00 PM").unwrap(), "2023-09-05 23:45:00");
        assert_eq!(formatted("09/05/2023 12:05:00 AM").unwrap(), "2023-09-05 00:05:00");
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(formatted("2024-03-01").unwrap(), "2024-03-01 00:00:00");
    }

    #[test]
    fn distinguishes_missing_from_malformed() {
        assert_eq!(parse_timestamp(""), FieldParse::Missing);
        assert_eq!(parse_timestamp("NaN"), FieldParse::Missing);
        assert_eq!(parse_timestamp("yesterday"), FieldParse::Malformed);
        assert_eq!(parse_timestamp("2024-13-40T99:00:00"), FieldParse::Malformed);
    }

    #[test]
    fn parses_flags() {
        for truthy in ["true", "TRUE", " t ", "Yes", "y", "1", "1.0"] {
            assert!(parse_flag(truthy), "{truthy} should be true");
        }
        for falsy in ["false", "", "0", "N", "no", "maybe"] {
            assert!(!parse_flag(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn parses_area_ids() {
        assert_eq!(parse_area_id("11"), FieldParse::Parsed(11));
        assert_eq!(parse_area_id(" 011 "), FieldParse::Parsed(11));
        assert_eq!(parse_area_id("7.0"), FieldParse::Parsed(7));
        assert_eq!(parse_area_id(""), FieldParse::Missing);
        assert_eq!(parse_area_id("north"), FieldParse::Malformed);
        assert_eq!(parse_area_id("inf"), FieldParse::Malformed);
    }

    #[test]
    fn detects_zero_cells() {
        assert!(is_zero_cell("0"));
        assert!(is_zero_cell("0.0"));
        assert!(is_zero_cell(" -0 "));
        assert!(!is_zero_cell("0.1"));
        assert!(!is_zero_cell(""));
        assert!(!is_zero_cell("false"));
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_coordinate("41.5"), FieldParse::Parsed(41.5));
        assert_eq!(parse_coordinate(""), FieldParse::Missing);
        assert_eq!(parse_coordinate("abc"), FieldParse::Malformed);
    }
}
