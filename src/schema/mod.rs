// src/schema/mod.rs
use arrow::datatypes::{DataType, Field, Schema};
use chrono::{Datelike, NaiveDate};

/// First year of the analysis window, inclusive.
pub const ANALYSIS_START_YEAR: i32 = 2006;
/// Last year of the analysis window, inclusive.
pub const ANALYSIS_END_YEAR: i32 = 2015;

/// Days from 0001-01-01 (CE) to the Date32 epoch, 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Column names of the sales file, in file order. The header row of the
/// input is ignored; this declared schema is what the columns mean.
pub const RAW_COLUMNS: [&str; 12] = [
    "title",
    "publisher",
    "developer",
    "release_date",
    "platform",
    "total_sales",
    "na_sales",
    "japan_sales",
    "pal_sales",
    "other_sales",
    "user_score",
    "critic_score",
];

/// Schema the file is read under: every column Utf8 and nullable, so that
/// a malformed cell never aborts the read. Typing happens afterwards.
pub fn raw_schema() -> Schema {
    Schema::new(
        RAW_COLUMNS
            .iter()
            .map(|n| Field::new(*n, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    )
}

/// Schema of the projected table the analysis runs over.
pub fn projected_schema() -> Schema {
    Schema::new(vec![
        Field::new("publisher", DataType::Utf8, true),
        Field::new("release_date", DataType::Date32, true),
        Field::new("na_sales", DataType::Float64, true),
        Field::new("total_sales", DataType::Float64, true),
    ])
}

/// Fast parse of `"YYYY-MM-DD"` (or `"YYYY/MM/DD"`) → `NaiveDate`.
pub fn parse_release_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // byte-index slicing below requires char boundaries; cells are
    // arbitrary user data, so a multibyte char must reject, not panic
    if !s.is_ascii() || s.len() < 10 {
        return None;
    }
    let sep = &s[4..5];
    if (sep != "-" && sep != "/") || &s[7..8] != sep {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days since 1970-01-01 for a date, the Date32 representation.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Calendar year of a Date32 value.
pub fn days_to_year(days: i32) -> Option<i32> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE).map(|d| d.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dash_and_slash_dates() {
        let d = parse_release_date("2009-11-17").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2009, 11, 17));
        let d = parse_release_date("2009/11/17").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2009, 11, 17));
        assert!(parse_release_date(" 2013-03-05 ").is_some());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_release_date("").is_none());
        assert!(parse_release_date("N/A").is_none());
        assert!(parse_release_date("17-11-2009").is_none());
        assert!(parse_release_date("2009-13-01").is_none());
        assert!(parse_release_date("2009.11.17").is_none());
    }

    #[test]
    fn rejects_non_ascii_dates_without_panicking() {
        // multibyte chars straddling the slice boundaries must reject cleanly
        assert!(parse_release_date("2009-11-1\u{e9}").is_none());
        assert!(parse_release_date("200\u{e9}-11-17").is_none());
        assert!(parse_release_date("２００９-11-17").is_none());
        assert!(parse_release_date("2009年11月17日").is_none());
    }

    #[test]
    fn date32_roundtrip_preserves_year() {
        let d = NaiveDate::from_ymd_opt(2006, 1, 1).unwrap();
        assert_eq!(days_to_year(date_to_days(d)), Some(2006));
        let d = NaiveDate::from_ymd_opt(2015, 12, 31).unwrap();
        assert_eq!(days_to_year(date_to_days(d)), Some(2015));
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
    }
}
