use ansi_term::Colour;
use regex::Regex;

use crate::db::log::{UpdateLogEntry, recent_updates};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

const STATUS_COLUMN_MAX: usize = 40;

fn strip_ansi(s: &str) -> String {
    match Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(_) => s.to_string(),
    }
}

fn color_for_status(status: &str) -> Colour {
    match status {
        "SUCCESS" => Colour::Green,
        "ERROR" => Colour::Red,
        "CONFIG" => Colour::Purple,
        _ => Colour::White,
    }
}

/// `STATUS (source)` with only the status word coloured.
fn status_label(entry: &UpdateLogEntry) -> String {
    let color = color_for_status(&entry.status);
    format!("{} ({})", color.paint(entry.status.as_str()), entry.source)
}

fn format_entry(entry: &UpdateLogEntry, id_w: usize, date_w: usize, status_w: usize) -> String {
    let date = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| entry.timestamp.clone());

    let label = status_label(entry);
    let padding = " ".repeat(status_w.saturating_sub(strip_ansi(&label).chars().count()));

    let counts = if entry.status == "SUCCESS" {
        format!(
            " [events: {}, unassigned: {}]",
            entry.events_processed, entry.unassigned_events
        )
    } else {
        String::new()
    };

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}{}",
        entry.id,
        date,
        label,
        padding,
        entry.message,
        counts,
        id_w = id_w,
        date_w = date_w
    )
}

pub struct LogLogic;

impl LogLogic {
    /// Print the most recent `limit` refresh attempts, oldest first.
    pub fn print_log(pool: &DbPool, limit: usize) -> AppResult<()> {
        let mut entries = recent_updates(&pool.conn, limit)?;
        if entries.is_empty() {
            info("No refresh has been logged yet.");
            return Ok(());
        }
        entries.reverse();

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.timestamp.len()).max().unwrap_or(10);
        let status_w = entries
            .iter()
            .map(|e| strip_ansi(&status_label(e)).chars().count())
            .max()
            .unwrap_or(10)
            .min(STATUS_COLUMN_MAX);

        println!("📜 Update log:\n");
        for entry in &entries {
            println!("{}", format_entry(entry, id_w, date_w, status_w));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: &str) -> UpdateLogEntry {
        UpdateLogEntry {
            id: 7,
            timestamp: "2026-03-01T10:15:00+01:00".to_string(),
            status: status.to_string(),
            source: "scheduler".to_string(),
            message: "Calendar updated".to_string(),
            events_processed: 12,
            unassigned_events: 2,
        }
    }

    #[test]
    fn success_rows_carry_counts() {
        let line = strip_ansi(&format_entry(&entry("SUCCESS"), 2, 25, 20));
        assert_eq!(
            line,
            " 7: 2026-03-01T10:15:00+01:00 | SUCCESS (scheduler)  => Calendar updated [events: 12, unassigned: 2]"
        );
    }

    #[test]
    fn error_rows_are_coloured_red() {
        let line = format_entry(&entry("ERROR"), 1, 25, 10);
        assert!(line.contains(&Colour::Red.paint("ERROR").to_string()));
        assert!(!strip_ansi(&line).contains("[events"));
    }
}
