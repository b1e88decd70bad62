//! Append-only log of refresh attempts (`update_logs`).

use chrono::Local;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::fmt;

use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateStatus {
    Success,
    Error,
    Config,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Success => "SUCCESS",
            UpdateStatus::Error => "ERROR",
            UpdateStatus::Config => "CONFIG",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who asked for the refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    Cli,
    Web,
    Scheduler,
}

impl UpdateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSource::Cli => "cli",
            UpdateSource::Web => "web",
            UpdateSource::Scheduler => "scheduler",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateLogEntry {
    pub id: i64,
    pub timestamp: String,
    pub status: String,
    pub source: String,
    pub message: String,
    pub events_processed: i64,
    pub unassigned_events: i64,
}

pub fn record_update(
    conn: &Connection,
    status: UpdateStatus,
    source: UpdateSource,
    message: &str,
    events_processed: usize,
    unassigned_events: usize,
) -> AppResult<i64> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO update_logs (timestamp, status, source, message, events_processed, unassigned_events)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    stmt.execute(params![
        now,
        status.as_str(),
        source.as_str(),
        message,
        events_processed as i64,
        unassigned_events as i64
    ])?;

    Ok(conn.last_insert_rowid())
}

/// Most recent rows first.
pub fn recent_updates(conn: &Connection, limit: usize) -> AppResult<Vec<UpdateLogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, timestamp, status, source, message, events_processed, unassigned_events
         FROM update_logs ORDER BY id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(UpdateLogEntry {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            status: row.get(2)?,
            source: row.get(3)?,
            message: row.get(4)?,
            events_processed: row.get(5)?,
            unassigned_events: row.get(6)?,
        })
    })?;

    let mut entries = Vec::new();
    for r in rows {
        entries.push(r?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn rows_come_back_newest_first() {
        let pool = DbPool::in_memory().unwrap();
        record_update(&pool.conn, UpdateStatus::Config, UpdateSource::Web, "configured", 0, 0).unwrap();
        record_update(&pool.conn, UpdateStatus::Success, UpdateSource::Scheduler, "ok", 12, 2).unwrap();
        record_update(&pool.conn, UpdateStatus::Error, UpdateSource::Cli, "boom", 0, 0).unwrap();

        let rows = recent_updates(&pool.conn, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, "ERROR");
        assert_eq!(rows[0].source, "cli");
        assert_eq!(rows[1].events_processed, 12);
        assert_eq!(rows[1].unassigned_events, 2);
    }
}
