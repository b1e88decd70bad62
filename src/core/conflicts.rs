//! Staffing conflicts: one employee booked on overlapping date ranges.

use std::collections::{BTreeMap, HashSet};
use tracing::info;

use super::is_placeholder_name;
use crate::models::{Conflict, Event, TimelineEntry};

pub type Timelines = BTreeMap<String, Vec<TimelineEntry>>;

/// Per-employee bookings, each list sorted by start date (stable).
pub fn build_timelines(events: &[Event]) -> Timelines {
    let mut timelines: Timelines = BTreeMap::new();

    for event in events {
        for assignment in &event.assignments {
            if is_placeholder_name(&assignment.employee) {
                continue;
            }
            timelines
                .entry(assignment.employee.clone())
                .or_default()
                .push(TimelineEntry {
                    event_id: event.id.clone(),
                    event_name: event.name.clone(),
                    city: event.city.clone(),
                    category: event.category.clone(),
                    from_date: assignment.from_date,
                    to_date: assignment.to_date,
                });
        }
    }

    for timeline in timelines.values_mut() {
        timeline.sort_by_key(|entry| entry.from_date);
    }
    timelines
}

/// Every pair `i < j` of a sorted timeline with `t[i].end >= t[j].start`.
/// Same-day hand-offs count as conflicts.
pub fn detect(timelines: &Timelines) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();

    for (employee, timeline) in timelines {
        for (i, first) in timeline.iter().enumerate() {
            for second in &timeline[i + 1..] {
                if first.event_id == second.event_id {
                    continue;
                }
                if first.to_date < second.from_date {
                    continue;
                }
                if !seen.insert((employee.as_str(), first.event_id.as_str(), second.event_id.as_str())) {
                    continue;
                }

                conflicts.push(Conflict {
                    employee: employee.clone(),
                    first: first.clone(),
                    second: second.clone(),
                    overlap_start: second.from_date,
                    overlap_end: first.to_date.min(second.to_date),
                });
            }
        }
    }

    info!(count = conflicts.len(), "staffing conflicts detected");
    conflicts
}
