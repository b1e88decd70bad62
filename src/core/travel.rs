//! Travel connections: the same person finishing or starting another event
//! within a week of this one.

use tracing::info;

use super::conflicts::Timelines;
use super::is_placeholder_name;
use crate::models::{Event, TravelInfo, TravelLink};
use crate::utils::date::days_between;

pub const TRAVEL_WINDOW_DAYS: i64 = 7;

fn within_window(gap: i64) -> bool {
    (1..=TRAVEL_WINDOW_DAYS).contains(&gap)
}

/// Fill `travel` on every event and flag the connected assignments.
pub fn annotate(events: &mut [Event], timelines: &Timelines) {
    let mut linked_events = 0;

    for event in events.iter_mut() {
        let mut travel = TravelInfo::default();

        for assignment in event.assignments.iter_mut() {
            if is_placeholder_name(&assignment.employee) {
                continue;
            }
            let Some(timeline) = timelines.get(&assignment.employee) else {
                continue;
            };

            let mut connected = false;
            for other in timeline.iter().filter(|o| o.event_id != event.id) {
                let link = |gap_days| TravelLink {
                    employee: assignment.employee.clone(),
                    event_id: other.event_id.clone(),
                    event_name: other.event_name.clone(),
                    city: other.city.clone(),
                    gap_days,
                };

                let gap_prev = days_between(other.to_date, assignment.from_date);
                if within_window(gap_prev) {
                    travel.from_previous.push(link(gap_prev));
                    connected = true;
                }

                let gap_next = days_between(assignment.to_date, other.from_date);
                if within_window(gap_next) {
                    travel.to_next.push(link(gap_next));
                    connected = true;
                }
            }

            assignment.has_travel_connection = connected;
            if connected && !travel.people_with_travel.contains(&assignment.employee) {
                travel.people_with_travel.push(assignment.employee.clone());
            }
        }

        if !travel.is_empty() {
            linked_events += 1;
        }
        event.travel = travel;
    }

    info!(events = linked_events, "travel connections annotated");
}
