//! Transaction date parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Receipt date format requested from the model: `dd.mm.yyyy`
static STRICT_DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("Invalid date regex"));

/// Date-only formats accepted by the generic fallback, in order of attempt
const GENERIC_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Date-time formats accepted by the generic fallback (date part is kept)
const GENERIC_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse the reconciled transaction date into a calendar date
///
/// The strict `dd.mm.yyyy` form is tried first; anything else goes through
/// generic parsing (ISO dates, RFC 3339 timestamps and a few common
/// day-first layouts). An unparseable string yields `None`, never an error.
pub fn parse_receipt_date(input: &str) -> Option<NaiveDate> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if STRICT_DMY.is_match(value) {
        if let Ok(date) = NaiveDate::parse_from_str(value, "%d.%m.%Y") {
            return Some(date);
        }
    }

    parse_generic(value)
}

fn parse_generic(value: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_day_month_year() {
        assert_eq!(
            parse_receipt_date("05.03.2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_receipt_date(" 31.12.2023 "),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn test_generic_formats() {
        assert_eq!(
            parse_receipt_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_receipt_date("2024-03-05T10:15:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_receipt_date("2024-03-05T10:15:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_receipt_date("05/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_receipt_date("5.3.2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_receipt_date("not-a-date"), None);
        assert_eq!(parse_receipt_date(""), None);
        assert_eq!(parse_receipt_date("31.02.2024"), None);
    }
}
