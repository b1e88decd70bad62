use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaterialLevel {
    Urgent,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlightLevel {
    Critical,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Europe,
    OutsideEurope,
}

impl fmt::Display for MaterialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaterialLevel::Urgent => "URGENT",
            MaterialLevel::Warning => "WARNING",
        })
    }
}

impl fmt::Display for FlightLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlightLevel::Critical => "CRITICAL",
            FlightLevel::Warning => "WARNING",
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Europe => "Europe",
            Region::OutsideEurope => "Outside Europe",
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialAlert {
    pub level: MaterialLevel,
    pub departure_date: NaiveDate,
    pub days_to_departure: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlightAlert {
    pub level: FlightLevel,
    pub region: Region,
    pub threshold_days: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Alert {
    pub event_id: String,
    pub event_name: String,
    pub city: String,
    pub from_date: NaiveDate,
    pub days_until: i64,
    pub material: Option<MaterialAlert>,
    pub flight: Option<FlightAlert>,
}
