use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::date::{ranges_overlap, span_days};

/// One employee booked on an event for a sub-range of its dates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Assignment {
    pub employee: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub remote: bool,
    pub days: i64,
    pub has_travel_connection: bool,
}

impl Assignment {
    pub fn new(employee: impl Into<String>, from_date: NaiveDate, to_date: NaiveDate, remote: bool) -> Self {
        Self {
            employee: employee.into(),
            from_date,
            to_date,
            remote,
            days: span_days(from_date, to_date),
            has_travel_connection: false,
        }
    }
}

/// A neighbouring assignment of the same employee within travel distance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TravelLink {
    pub employee: String,
    pub event_id: String,
    pub event_name: String,
    pub city: String,
    pub gap_days: i64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TravelInfo {
    pub people_with_travel: Vec<String>,
    pub from_previous: Vec<TravelLink>,
    pub to_next: Vec<TravelLink>,
}

impl TravelInfo {
    pub fn is_empty(&self) -> bool {
        self.from_previous.is_empty() && self.to_next.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub label: String,
    pub city: String,
    pub championship: String,
    pub category: String,
    pub color: String,
    pub coordinator: String,
    pub status: String,
    pub confirmed: bool,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub duration_days: i64,
    pub week: u32,
    pub month: String,
    pub days_until: i64,
    pub assignments: Vec<Assignment>,
    pub employees_count: usize,
    pub needs_attention: bool,
    pub is_critical: bool,
    pub travel: TravelInfo,
}

impl Event {
    pub fn is_unassigned(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("CANCELLED")
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        ranges_overlap(
            (self.from_date, self.to_date),
            (other.from_date, other.to_date),
        )
    }

    pub fn staff_names(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.employee.as_str()).collect()
    }

    /// `dd/mm - dd/mm` label used in tables and on the dashboard.
    pub fn date_range(&self) -> String {
        format!(
            "{} - {}",
            crate::utils::date::display_short(self.from_date),
            crate::utils::date::display_short(self.to_date)
        )
    }
}
