//! Record store access: raw page sources, typed decoding and the TTL cache.

pub mod cache;
pub mod records;
pub mod source;

pub use cache::{CachedFetcher, Clock, SystemClock};
pub use records::{EmployeeFields, EventFields, RawRecord, RecordPage, ReservationFields, Typed};
pub use source::{AirtableSource, FixtureSource, RecordSource, RetryPolicy};

use crate::config::{AirtableConfig, TableIds};
use crate::errors::AppResult;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Logical tables of the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Events,
    Reservations,
    Employees,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Events => "events",
            Table::Reservations => "reservations",
            Table::Employees => "employees",
        }
    }

    pub fn id<'a>(&self, ids: &'a TableIds) -> &'a str {
        match self {
            Table::Events => &ids.events,
            Table::Reservations => &ids.reservations,
            Table::Employees => &ids.employees,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the cached fetcher for the configured source. A fixture directory
/// replaces the HTTP source entirely.
pub fn build_fetcher(cfg: &AirtableConfig, fixtures: Option<&Path>) -> AppResult<CachedFetcher> {
    let source: Arc<dyn RecordSource> = match fixtures {
        Some(dir) => Arc::new(FixtureSource::new(dir)),
        None => Arc::new(AirtableSource::new(cfg)?),
    };

    Ok(CachedFetcher::new(
        source,
        Duration::from_secs(cfg.cache_ttl_secs),
    ))
}
