//! Reconciliation pipeline: records → events → conflicts, travel, alerts.

pub mod alerts;
pub mod conflicts;
pub mod details;
pub mod log;
pub mod reconcile;
pub mod staff;
pub mod travel;

/// Names used when an employee cannot be identified. They never take part
/// in per-person timelines.
pub const UNNAMED_EMPLOYEE: &str = "Unnamed";
pub const UNASSIGNED_EMPLOYEE: &str = "Unassigned";

pub fn is_placeholder_name(name: &str) -> bool {
    name == UNNAMED_EMPLOYEE || name == UNASSIGNED_EMPLOYEE
}
