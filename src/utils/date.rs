use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse the `YYYY-MM-DD` format used by Airtable date fields and the CLI.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Inclusive day count of a date range.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    days_between(start, end) + 1
}

/// Inclusive intersection test for two date ranges.
pub fn ranges_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    !(a.1 < b.0 || a.0 > b.1)
}

/// `dd/mm/YYYY`, the format shown on the dashboard and in reports.
pub fn display(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

/// `dd/mm`, used for compact date ranges.
pub fn display_short(d: NaiveDate) -> String {
    d.format("%d/%m").to_string()
}

pub fn month_key(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}

pub fn iso_week(d: NaiveDate) -> u32 {
    d.iso_week().week()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn parse_accepts_airtable_format_only() {
        assert_eq!(parse_date("2026-03-14"), Some(d("2026-03-14")));
        assert_eq!(parse_date(" 2026-03-14 "), Some(d("2026-03-14")));
        assert!(parse_date("14/03/2026").is_none());
        assert!(parse_date("2026-02-30").is_none());
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = (d("2026-05-01"), d("2026-05-03"));
        assert!(ranges_overlap(a, (d("2026-05-03"), d("2026-05-05"))));
        assert!(!ranges_overlap(a, (d("2026-05-04"), d("2026-05-05"))));
        assert!(ranges_overlap(a, (d("2026-04-01"), d("2026-06-01"))));
    }

    #[test]
    fn spans_and_keys() {
        assert_eq!(span_days(d("2026-05-01"), d("2026-05-03")), 3);
        assert_eq!(days_between(d("2026-05-03"), d("2026-05-01")), -2);
        assert_eq!(month_key(d("2026-05-03")), "2026-05");
        assert_eq!(display(d("2026-05-03")), "03/05/2026");
        assert_eq!(iso_week(d("2026-01-01")), 1);
    }
}
