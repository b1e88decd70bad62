//! Joins events, reservations and the employee directory into a [`Snapshot`].

use chrono::{Duration, Local, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, info};

use super::{UNASSIGNED_EMPLOYEE, UNNAMED_EMPLOYEE, alerts, conflicts, travel};
use crate::airtable::records::{self, EmployeeFields, EventFields, RawRecord, ReservationFields, Typed};
use crate::config::{ReconcileConfig, StaffingSource};
use crate::errors::{AppError, AppResult};
use crate::models::category::{category_color, resolve_category};
use crate::models::{Assignment, CriticalDate, DashboardStats, Employee, Event, GroupStats, Snapshot};
use crate::utils::date::{days_between, iso_week, month_key, parse_date, span_days};

pub const NO_COORDINATOR: &str = "No coordinator";
pub const UNNAMED_EVENT: &str = "Unnamed";

/// Events starting within this many days are flagged critical.
pub const CRITICAL_WINDOW_DAYS: i64 = 30;
/// Unstaffed confirmed events starting within this many days are listed
/// as critical dates.
pub const CRITICAL_DATE_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub today: NaiveDate,
    pub window_days: i64,
    pub staffing: StaffingSource,
}

impl ReconcileOptions {
    pub fn from_config(cfg: &ReconcileConfig, today: NaiveDate) -> Self {
        Self {
            today,
            window_days: cfg.window_days,
            staffing: cfg.staffing_source,
        }
    }
}

/// Typed contents of the three tables.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub events: Vec<Typed<EventFields>>,
    pub reservations: Vec<Typed<ReservationFields>>,
    pub employees: Vec<Employee>,
}

impl SourceData {
    pub fn decode(events: &[RawRecord], reservations: &[RawRecord], employees: &[RawRecord]) -> Self {
        Self {
            events: records::decode("events", events),
            reservations: records::decode("reservations", reservations),
            employees: employees_from(&records::decode::<EmployeeFields>("employees", employees)),
        }
    }
}

pub fn employees_from(records: &[Typed<EmployeeFields>]) -> Vec<Employee> {
    records
        .iter()
        .map(|r| Employee {
            id: r.id.clone(),
            name: r
                .fields
                .name
                .clone()
                .unwrap_or_else(|| UNNAMED_EMPLOYEE.to_string()),
            email: r.fields.email.clone().unwrap_or_default(),
            position: r.fields.position.clone().unwrap_or_default(),
        })
        .collect()
}

/// Parsed `FROM`/`TO` of a reservation, if both are present and valid.
pub fn reservation_dates(fields: &ReservationFields) -> Option<(NaiveDate, NaiveDate)> {
    let from = parse_date(fields.from.as_deref()?)?;
    let to = parse_date(fields.to.as_deref()?)?;
    Some((from, to))
}

fn assignments_by_people_link(
    event: &Typed<EventFields>,
    event_dates: (NaiveDate, NaiveDate),
    data: &SourceData,
    names: &HashMap<&str, &str>,
) -> Vec<Assignment> {
    event
        .fields
        .people_reserved
        .iter()
        .map(|employee_id| {
            let name = names
                .get(employee_id.as_str())
                .copied()
                .unwrap_or(UNNAMED_EMPLOYEE);

            let booked = data.reservations.iter().find_map(|r| {
                let links_event = r.fields.events.iter().any(|id| *id == event.id);
                let links_employee = r.fields.employees.iter().any(|id| id == employee_id);
                if !(links_event && links_employee) {
                    return None;
                }
                reservation_dates(&r.fields).map(|(from, to)| (from, to, r.fields.remote))
            });

            match booked {
                Some((from, to, remote)) => Assignment::new(name, from, to, remote),
                None => Assignment::new(name, event_dates.0, event_dates.1, false),
            }
        })
        .collect()
}

fn assignments_by_reservations(event: &Typed<EventFields>, data: &SourceData) -> Vec<Assignment> {
    data.reservations
        .iter()
        .filter(|r| r.fields.events.first() == Some(&event.id))
        .filter_map(|r| {
            let (from, to) = reservation_dates(&r.fields)?;
            let name = r
                .fields
                .employee_names
                .first()
                .map(String::as_str)
                .unwrap_or(UNASSIGNED_EMPLOYEE);
            Some(Assignment::new(name, from, to, r.fields.remote))
        })
        .collect()
}

fn build_event(
    record: &Typed<EventFields>,
    from_date: NaiveDate,
    to_date: NaiveDate,
    assignments: Vec<Assignment>,
    today: NaiveDate,
) -> Event {
    let fields = &record.fields;
    let championship = fields.championship.first().cloned().unwrap_or_default();
    let category = resolve_category(&championship);
    let days_until = days_between(today, from_date);
    let employees_count = assignments.len();

    Event {
        id: record.id.clone(),
        name: fields
            .name
            .clone()
            .unwrap_or_else(|| UNNAMED_EVENT.to_string()),
        label: fields.label.clone().unwrap_or_default(),
        city: fields.city.clone().unwrap_or_default(),
        championship,
        category: category.to_string(),
        color: category_color(category).to_string(),
        coordinator: fields
            .coordinator
            .first()
            .cloned()
            .unwrap_or_else(|| NO_COORDINATOR.to_string()),
        status: fields.status.clone().unwrap_or_default(),
        confirmed: fields.confirmed,
        from_date,
        to_date,
        duration_days: span_days(from_date, to_date),
        week: iso_week(from_date),
        month: month_key(from_date),
        days_until,
        needs_attention: employees_count == 0 && fields.confirmed,
        is_critical: days_until <= CRITICAL_WINDOW_DAYS,
        employees_count,
        assignments,
        travel: Default::default(),
    }
}

fn tally(group: &mut GroupStats, event: &Event) {
    group.total += 1;
    group.employees += event.employees_count;
    if event.confirmed {
        group.confirmed += 1;
    }
    if event.needs_attention {
        group.unassigned += 1;
    }
}

pub fn compute_stats(events: &[Event]) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for event in events {
        stats.total_events += 1;
        stats.total_reservations += event.employees_count;
        stats.remote_assignments += event.assignments.iter().filter(|a| a.remote).count();
        *stats.by_month.entry(event.month.clone()).or_default() += 1;

        if event.confirmed {
            stats.confirmed_events += 1;
        }
        if event.is_cancelled() {
            stats.cancelled_events += 1;
        }
        if event.needs_attention {
            stats.unassigned_events += 1;
        }

        tally(stats.by_set.entry(event.category.clone()).or_default(), event);
        tally(stats.by_coordinator.entry(event.coordinator.clone()).or_default(), event);

        if event.needs_attention && event.days_until <= CRITICAL_DATE_DAYS {
            stats.critical_dates.push(CriticalDate {
                event_id: event.id.clone(),
                event_name: event.name.clone(),
                city: event.city.clone(),
                category: event.category.clone(),
                coordinator: event.coordinator.clone(),
                from_date: event.from_date,
                days_until: event.days_until,
            });
        }
    }

    stats
}

/// Run the full pipeline for one reference date.
pub fn reconcile(data: &SourceData, opts: &ReconcileOptions) -> AppResult<Snapshot> {
    if data.events.is_empty() {
        return Err(AppError::NoEvents);
    }

    let window_start = opts.today;
    let window_end = Duration::try_days(opts.window_days)
        .and_then(|span| opts.today.checked_add_signed(span))
        .ok_or_else(|| {
            AppError::Config(format!("reconcile.window_days: {} is out of range", opts.window_days))
        })?;

    let names: HashMap<&str, &str> = data
        .employees
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    let mut events = Vec::new();
    for record in &data.events {
        let dates = record
            .fields
            .from
            .as_deref()
            .and_then(parse_date)
            .zip(record.fields.to.as_deref().and_then(parse_date));
        let Some((from_date, to_date)) = dates else {
            debug!(record = %record.id, "event without valid dates skipped");
            continue;
        };

        if from_date > window_end || to_date < window_start {
            continue;
        }

        let assignments = match opts.staffing {
            StaffingSource::PeopleLink => {
                assignments_by_people_link(record, (from_date, to_date), data, &names)
            }
            StaffingSource::Reservations => assignments_by_reservations(record, data),
        };

        events.push(build_event(record, from_date, to_date, assignments, opts.today));
    }

    events.sort_by_key(|e| e.from_date);

    let timelines = conflicts::build_timelines(&events);
    let conflicts = conflicts::detect(&timelines);
    travel::annotate(&mut events, &timelines);
    let alerts = alerts::generate(&events);

    let mut stats = compute_stats(&events);
    stats.conflicts = conflicts.len();
    stats.alerts = alerts.len();

    let unassigned_events: Vec<Event> = events.iter().filter(|e| e.needs_attention).cloned().collect();

    info!(
        events = stats.total_events,
        unassigned = stats.unassigned_events,
        reservations = stats.total_reservations,
        conflicts = stats.conflicts,
        "events reconciled"
    );

    Ok(Snapshot {
        events,
        unassigned_events,
        stats,
        conflicts,
        timelines,
        alerts,
        generated_at: Local::now(),
        today: opts.today,
        window_start,
        window_end,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const TODAY: &str = "2026-03-01";

    pub fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    /// A confirmed event with the given bookings, relative to [`TODAY`].
    pub fn event_with(id: &str, from: &str, to: &str, staff: &[(&str, &str, &str)]) -> Event {
        let record = Typed {
            id: id.to_string(),
            fields: EventFields {
                name: Some(format!("Event {id}")),
                city: Some("Monza".to_string()),
                confirmed: true,
                ..Default::default()
            },
        };
        let assignments = staff
            .iter()
            .map(|(name, f, t)| Assignment::new(*name, d(f), d(t), false))
            .collect();
        build_event(&record, d(from), d(to), assignments, d(TODAY))
    }
}
