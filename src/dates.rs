//! Date parsing and formatting helpers.
//!
//! The whole application speaks `dd/mm/YYYY`. Tools that take dates from
//! the model accept a few other common shapes as well ([`parse_lenient`]),
//! since the model occasionally ignores the instructed format; the date
//! calculator and booking updates require the canonical format
//! ([`parse_strict`]).

use chrono::NaiveDate;

/// Canonical date format used in tables, prompts, and tool payloads.
pub const DATE_FMT: &str = "%d/%m/%Y";

/// Formats a date in the canonical `dd/mm/YYYY` form.
pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Parses a date strictly as `dd/mm/YYYY`.
pub fn parse_strict(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

/// Parses a date leniently, trying the canonical format first and then a
/// few common variants.
pub fn parse_lenient(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%d/%m/%y"];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_accepts_canonical_only() {
        assert_eq!(
            parse_strict("01/08/2024"),
            NaiveDate::from_ymd_opt(2024, 8, 1)
        );
        assert_eq!(parse_strict("2024-08-01"), None);
        assert_eq!(parse_strict("not a date"), None);
    }

    #[test]
    fn lenient_accepts_common_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 8, 1);
        assert_eq!(parse_lenient("01/08/2024"), expected);
        assert_eq!(parse_lenient("01-08-2024"), expected);
        assert_eq!(parse_lenient("2024-08-01"), expected);
        assert_eq!(parse_lenient("garbage"), None);
    }

    #[test]
    fn round_trips_through_format() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_strict(&format(date)), Some(date));
    }
}
