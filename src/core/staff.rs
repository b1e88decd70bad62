//! Available staff for a date range.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::reconcile::reservation_dates;
use crate::airtable::records::{ReservationFields, Typed};
use crate::errors::{AppError, AppResult};
use crate::models::category::{DEFAULT_CATEGORY, resolve_category};
use crate::models::{AvailableStaff, Employee};
use crate::utils::date::{display, ranges_overlap};

const PLACEHOLDER_NAMES: &[&str] = &[
    "airtable.user1",
    "tba",
    "tbc",
    "to be announced",
    "to be confirmed",
    "por confirmar",
    "por anunciar",
    "pendiente",
];

const GENERIC_NAMES: &[&str] = &[
    "operations",
    "admin",
    "info",
    "contact",
    "support",
    "office",
    "staff",
    "team",
    "general",
];

const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_RESERVATION: i64 = 3;

/// False for mailboxes, placeholders and shared accounts in the directory.
pub fn is_real_person(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    if name.contains('@') || lower.chars().count() < 3 {
        return false;
    }
    !PLACEHOLDER_NAMES.iter().any(|p| lower.contains(p))
        && !GENERIC_NAMES.iter().any(|g| lower.contains(g))
}

#[derive(Debug, Clone)]
pub struct StaffQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub role: Option<String>,
}

impl StaffQuery {
    pub fn new(start: NaiveDate, end: NaiveDate, role: Option<String>) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidRange(format!(
                "start {} is after end {}",
                display(start),
                display(end)
            )));
        }
        let role = role.filter(|r| !r.trim().is_empty());
        Ok(Self { start, end, role })
    }

    fn matches_role(&self, position: &str) -> bool {
        match &self.role {
            Some(role) => position.to_lowercase().contains(&role.to_lowercase()),
            None => true,
        }
    }
}

/// Employees with no reservation overlapping the query range, busiest first.
pub fn available_staff(
    employees: &[Employee],
    reservations: &[Typed<ReservationFields>],
    query: &StaffQuery,
) -> Vec<AvailableStaff> {
    let mut available = Vec::new();

    for employee in employees {
        if !is_real_person(&employee.name) {
            debug!(name = %employee.name, "directory entry excluded");
            continue;
        }
        if !query.matches_role(&employee.position) {
            continue;
        }

        let own: Vec<&ReservationFields> = reservations
            .iter()
            .filter(|r| r.fields.employees.iter().any(|id| *id == employee.id))
            .map(|r| &r.fields)
            .collect();

        let dated: Vec<(NaiveDate, NaiveDate)> = own.iter().filter_map(|r| reservation_dates(r)).collect();
        if dated
            .iter()
            .any(|range| ranges_overlap(*range, (query.start, query.end)))
        {
            continue;
        }

        let set_experience: BTreeSet<String> = own
            .iter()
            .filter_map(|r| r.event_names.first())
            .map(|name| resolve_category(name))
            .filter(|category| *category != DEFAULT_CATEGORY)
            .map(str::to_string)
            .collect();

        let total = own.len();
        available.push(AvailableStaff {
            id: employee.id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.position.clone(),
            total_reservations: total,
            set_experience: set_experience.into_iter().collect(),
            last_reservation: dated.iter().map(|(_, end)| *end).max(),
            days_available: (DAYS_PER_YEAR - DAYS_PER_RESERVATION * total as i64).max(0),
        });
    }

    available.sort_by(|a, b| b.total_reservations.cmp(&a.total_reservations));
    info!(count = available.len(), "available staff found");
    available
}
