use chrono::NaiveDate;
use serde::Serialize;

/// Employee directory entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
}

/// Result row of the available-staff query.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableStaff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub total_reservations: usize,
    pub set_experience: Vec<String>,
    pub last_reservation: Option<NaiveDate>,
    pub days_available: i64,
}
