//! Per-event drill-down: staff conflicts, simultaneous events and neighbours.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::{Event, Snapshot};
use crate::utils::date::days_between;

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event_id: String,
    pub event_name: String,
    pub city: String,
    pub category: String,
    pub color: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl From<&Event> for EventSummary {
    fn from(e: &Event) -> Self {
        Self {
            event_id: e.id.clone(),
            event_name: e.name.clone(),
            city: e.city.clone(),
            category: e.category.clone(),
            color: e.color.clone(),
            from_date: e.from_date,
            to_date: e.to_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictDetail {
    pub conflicting_event: String,
    pub conflicting_city: String,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffDetail {
    pub name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub remote: bool,
    pub has_conflict: bool,
    pub has_travel_connection: bool,
    pub conflict_details: Vec<ConflictDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimultaneousEvent {
    #[serde(flatten)]
    pub event: EventSummary,
    pub shared_staff: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeighbourEvent {
    #[serde(flatten)]
    pub event: EventSummary,
    pub gap_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelAnalysis {
    pub has_previous: bool,
    pub has_next: bool,
    pub days_since_previous: Option<i64>,
    pub days_until_next: Option<i64>,
    pub people_with_travel: usize,
    pub simultaneous_count: usize,
    pub conflicting_staff: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub event: EventSummary,
    pub coordinator: String,
    pub duration_days: i64,
    pub staff: Vec<StaffDetail>,
    pub simultaneous_events: Vec<SimultaneousEvent>,
    pub previous_event: Option<NeighbourEvent>,
    pub next_event: Option<NeighbourEvent>,
    pub travel_analysis: TravelAnalysis,
}

fn staff_details(snapshot: &Snapshot, target: &Event) -> Vec<StaffDetail> {
    target
        .assignments
        .iter()
        .map(|a| {
            let conflict_details: Vec<ConflictDetail> = snapshot
                .conflicts_for(&target.id)
                .filter(|c| c.employee == a.employee)
                .filter_map(|c| {
                    let other = c.other_side(&target.id)?;
                    Some(ConflictDetail {
                        conflicting_event: other.event_name.clone(),
                        conflicting_city: other.city.clone(),
                        overlap_start: c.overlap_start,
                        overlap_end: c.overlap_end,
                    })
                })
                .collect();

            StaffDetail {
                name: a.employee.clone(),
                from_date: a.from_date,
                to_date: a.to_date,
                remote: a.remote,
                has_conflict: !conflict_details.is_empty(),
                has_travel_connection: a.has_travel_connection,
                conflict_details,
            }
        })
        .collect()
}

/// Closest event by gap, keeping the first one found on ties.
fn nearest<'a, I>(candidates: I) -> Option<NeighbourEvent>
where
    I: Iterator<Item = (i64, &'a Event)>,
{
    candidates
        .fold(None::<(i64, &Event)>, |best, (gap, event)| match best {
            Some((best_gap, _)) if best_gap <= gap => best,
            _ => Some((gap, event)),
        })
        .map(|(gap_days, event)| NeighbourEvent {
            event: event.into(),
            gap_days,
        })
}

pub fn event_details(snapshot: &Snapshot, event_id: &str) -> AppResult<EventDetails> {
    let target = snapshot
        .find_event(event_id)
        .ok_or_else(|| AppError::NotFound(format!("event '{event_id}'")))?;

    let staff = staff_details(snapshot, target);
    let target_staff = target.staff_names();

    let simultaneous_events: Vec<SimultaneousEvent> = snapshot
        .events
        .iter()
        .filter(|e| e.id != target.id && e.overlaps(target))
        .map(|e| SimultaneousEvent {
            event: e.into(),
            shared_staff: e
                .staff_names()
                .into_iter()
                .filter(|name| target_staff.contains(name))
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let previous_event = nearest(
        snapshot
            .events
            .iter()
            .filter(|e| e.to_date < target.from_date)
            .map(|e| (days_between(e.to_date, target.from_date), e)),
    );
    let next_event = nearest(
        snapshot
            .events
            .iter()
            .filter(|e| e.from_date > target.to_date)
            .map(|e| (days_between(target.to_date, e.from_date), e)),
    );

    let travel_analysis = TravelAnalysis {
        has_previous: previous_event.is_some(),
        has_next: next_event.is_some(),
        days_since_previous: previous_event.as_ref().map(|p| p.gap_days),
        days_until_next: next_event.as_ref().map(|n| n.gap_days),
        people_with_travel: target.travel.people_with_travel.len(),
        simultaneous_count: simultaneous_events.len(),
        conflicting_staff: staff.iter().filter(|s| s.has_conflict).count(),
    };

    Ok(EventDetails {
        event: target.into(),
        coordinator: target.coordinator.clone(),
        duration_days: target.duration_days,
        staff,
        simultaneous_events,
        previous_event,
        next_event,
        travel_analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conflicts::{build_timelines, detect};
    use crate::core::reconcile::test_support::{TODAY, d, event_with};
    use crate::models::DashboardStats;
    use chrono::Local;

    fn snapshot(events: Vec<Event>) -> Snapshot {
        let timelines = build_timelines(&events);
        let conflicts = detect(&timelines);
        Snapshot {
            events,
            unassigned_events: Vec::new(),
            stats: DashboardStats::default(),
            conflicts,
            timelines,
            alerts: Vec::new(),
            generated_at: Local::now(),
            today: d(TODAY),
            window_start: d(TODAY),
            window_end: d("2027-03-01"),
        }
    }

    fn sample() -> Snapshot {
        snapshot(vec![
            event_with("early", "2026-04-01", "2026-04-02", &[]),
            event_with("prev", "2026-04-05", "2026-04-06", &[]),
            event_with("target", "2026-04-10", "2026-04-12", &[("Ana", "2026-04-10", "2026-04-12"), ("Ben", "2026-04-10", "2026-04-12")]),
            event_with("clash", "2026-04-12", "2026-04-13", &[("Ana", "2026-04-12", "2026-04-13")]),
            event_with("next", "2026-04-20", "2026-04-21", &[]),
        ])
    }

    #[test]
    fn staff_carry_their_own_conflicts() {
        let details = event_details(&sample(), "target").unwrap();
        let ana = &details.staff[0];
        assert!(ana.has_conflict);
        assert_eq!(ana.conflict_details[0].conflicting_event, "Event clash");
        assert_eq!(ana.conflict_details[0].overlap_start, d("2026-04-12"));
        assert!(!details.staff[1].has_conflict);
        assert_eq!(details.travel_analysis.conflicting_staff, 1);
    }

    #[test]
    fn simultaneous_events_list_shared_staff() {
        let details = event_details(&sample(), "target").unwrap();
        assert_eq!(details.simultaneous_events.len(), 1);
        assert_eq!(details.simultaneous_events[0].event.event_id, "clash");
        assert_eq!(details.simultaneous_events[0].shared_staff, vec!["Ana"]);
    }

    #[test]
    fn nearest_neighbours_by_gap() {
        let details = event_details(&sample(), "target").unwrap();
        let prev = details.previous_event.unwrap();
        assert_eq!(prev.event.event_id, "prev");
        assert_eq!(prev.gap_days, 4);
        let next = details.next_event.unwrap();
        assert_eq!(next.event.event_id, "next");
        assert_eq!(next.gap_days, 8);
    }

    #[test]
    fn unknown_event_is_not_found() {
        assert!(matches!(
            event_details(&sample(), "nope"),
            Err(AppError::NotFound(_))
        ));
    }
}
