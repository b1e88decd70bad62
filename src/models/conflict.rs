use chrono::NaiveDate;
use serde::Serialize;

/// One booking in an employee's timeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub event_id: String,
    pub event_name: String,
    pub city: String,
    pub category: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Two overlapping bookings of the same employee. `first` starts no later
/// than `second`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Conflict {
    pub employee: String,
    pub first: TimelineEntry,
    pub second: TimelineEntry,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
}

impl Conflict {
    pub fn involves(&self, event_id: &str) -> bool {
        self.first.event_id == event_id || self.second.event_id == event_id
    }

    /// The booking on the other side of the conflict, seen from `event_id`.
    pub fn other_side(&self, event_id: &str) -> Option<&TimelineEntry> {
        if self.first.event_id == event_id {
            Some(&self.second)
        } else if self.second.event_id == event_id {
            Some(&self.first)
        } else {
            None
        }
    }
}
