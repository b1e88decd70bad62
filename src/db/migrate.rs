//! Forward-only schema migrations, recorded in the `migrations` table.

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::errors::{AppError, AppResult};

type MigrationFn = fn(&Connection) -> rusqlite::Result<()>;

/// Applied in order; names are never reused.
const MIGRATIONS: &[(&str, MigrationFn)] = &[
    ("001_create_update_logs", create_update_logs),
    ("002_add_update_logs_source", add_update_logs_source),
    ("003_index_update_logs_timestamp", index_update_logs_timestamp),
];

fn ensure_migrations_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            applied_at  TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM migrations WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn create_update_logs(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS update_logs (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp          TEXT NOT NULL,
            status             TEXT NOT NULL,
            message            TEXT NOT NULL DEFAULT '',
            events_processed   INTEGER NOT NULL DEFAULT 0,
            unassigned_events  INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
}

fn add_update_logs_source(conn: &Connection) -> rusqlite::Result<()> {
    if table_has_column(conn, "update_logs", "source")? {
        return Ok(());
    }
    conn.execute_batch("ALTER TABLE update_logs ADD COLUMN source TEXT NOT NULL DEFAULT 'cli';")
}

fn index_update_logs_timestamp(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_update_logs_timestamp ON update_logs(timestamp);",
    )
}

/// Apply every migration not yet recorded. Returns how many ran.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_migrations_table(conn)?;

    let mut applied = 0;
    for (name, migrate) in MIGRATIONS {
        if is_applied(conn, name)? {
            continue;
        }

        migrate(conn).map_err(|e| AppError::Migration(format!("{name}: {e}")))?;
        conn.execute(
            "INSERT INTO migrations (name, applied_at) VALUES (?1, ?2)",
            params![name, Local::now().to_rfc3339()],
        )?;
        info!(migration = name, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);
        assert!(table_has_column(&conn, "update_logs", "source").unwrap());
    }

    #[test]
    fn legacy_table_without_bookkeeping_is_upgraded() {
        let conn = Connection::open_in_memory().unwrap();
        create_update_logs(&conn).unwrap();
        conn.execute(
            "INSERT INTO update_logs (timestamp, status, message) VALUES ('2026-01-01T00:00:00+00:00', 'SUCCESS', 'old')",
            [],
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        let source: String = conn
            .query_row("SELECT source FROM update_logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(source, "cli");
    }
}
