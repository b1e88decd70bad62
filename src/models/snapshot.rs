use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Alert, Conflict, DashboardStats, Event, TimelineEntry};

/// Fully reconciled view of the record store at one point in time.
/// Published as a whole; never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub unassigned_events: Vec<Event>,
    pub stats: DashboardStats,
    pub conflicts: Vec<Conflict>,
    pub timelines: BTreeMap<String, Vec<TimelineEntry>>,
    pub alerts: Vec<Alert>,
    pub generated_at: DateTime<Local>,
    pub today: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

impl Snapshot {
    pub fn find_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn conflicts_for<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.conflicts.iter().filter(move |c| c.involves(event_id))
    }

    /// Events grouped by SET, as used by the dashboard.
    pub fn events_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| e.category.eq_ignore_ascii_case(category))
    }

    pub fn upcoming(&self, limit: usize) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(|e| e.days_until >= 0)
            .take(limit)
    }

    pub fn last_updated(&self) -> String {
        self.generated_at.format("%d/%m/%Y %H:%M").to_string()
    }
}
