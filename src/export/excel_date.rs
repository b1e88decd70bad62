use chrono::NaiveDate;

/// Days since the 1899-12-30 epoch used by spreadsheet date serials.
pub(crate) fn date_to_excel_serial(d: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (d - epoch).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_serials() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(date_to_excel_serial(d(1900, 3, 1)), 61.0);
        assert_eq!(date_to_excel_serial(d(2026, 3, 1)), 46082.0);
    }
}
