use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per coordinator / per SET counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GroupStats {
    pub total: usize,
    pub confirmed: usize,
    pub unassigned: usize,
    pub employees: usize,
}

impl GroupStats {
    /// `(confirmed - unassigned) / max(confirmed, 1)` as a percentage, one decimal.
    pub fn coverage(&self) -> f64 {
        let confirmed = self.confirmed as f64;
        let covered = confirmed - self.unassigned as f64;
        let pct = covered / confirmed.max(1.0) * 100.0;
        (pct * 10.0).round() / 10.0
    }

    pub fn state(&self) -> &'static str {
        let pct = self.coverage();
        if pct >= 90.0 {
            "OK"
        } else if pct >= 70.0 {
            "WATCH"
        } else {
            "ALERT"
        }
    }
}

/// Confirmed, unstaffed event starting within a week.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriticalDate {
    pub event_id: String,
    pub event_name: String,
    pub city: String,
    pub category: String,
    pub coordinator: String,
    pub from_date: NaiveDate,
    pub days_until: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub confirmed_events: usize,
    pub cancelled_events: usize,
    pub unassigned_events: usize,
    pub total_reservations: usize,
    pub remote_assignments: usize,
    pub conflicts: usize,
    pub alerts: usize,
    pub by_set: BTreeMap<String, GroupStats>,
    pub by_coordinator: BTreeMap<String, GroupStats>,
    pub by_month: BTreeMap<String, usize>,
    pub critical_dates: Vec<CriticalDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(confirmed: usize, unassigned: usize) -> GroupStats {
        GroupStats {
            total: confirmed,
            confirmed,
            unassigned,
            employees: 0,
        }
    }

    #[test]
    fn coverage_is_rounded_to_one_decimal() {
        assert_eq!(group(3, 1).coverage(), 66.7);
        assert_eq!(group(10, 0).coverage(), 100.0);
    }

    #[test]
    fn coverage_without_confirmed_events_does_not_divide_by_zero() {
        assert_eq!(group(0, 0).coverage(), 0.0);
        assert_eq!(group(0, 0).state(), "ALERT");
    }

    #[test]
    fn states_follow_thresholds() {
        assert_eq!(group(10, 1).state(), "OK");
        assert_eq!(group(10, 3).state(), "WATCH");
        assert_eq!(group(10, 4).state(), "ALERT");
    }
}
