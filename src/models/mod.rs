pub mod alert;
pub mod category;
pub mod conflict;
pub mod employee;
pub mod event;
pub mod snapshot;
pub mod stats;

pub use alert::{Alert, FlightAlert, FlightLevel, MaterialAlert, MaterialLevel, Region};
pub use conflict::{Conflict, TimelineEntry};
pub use employee::{AvailableStaff, Employee};
pub use event::{Assignment, Event, TravelInfo, TravelLink};
pub use snapshot::Snapshot;
pub use stats::{CriticalDate, DashboardStats, GroupStats};
