//! Server-rendered pages. Plain HTML, no client-side framework.

use crate::config::Config;
use crate::context::UpdateState;
use crate::models::Snapshot;
use crate::utils::date::display;

const UPCOMING_LIMIT: usize = 20;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th{background:#2F75B5;color:#fff;text-align:left}\
th,td{padding:4px 10px;border:1px solid #ccc}\
tr:nth-child(even){background:#EAF3FB}\
.card{display:inline-block;margin:0 1em 1em 0;padding:.6em 1em;border:1px solid #ccc}\
.warn{background:#FFF3CD}.danger{background:#F8D7DA}\
.swatch{display:inline-block;width:.8em;height:.8em;margin-right:.4em}";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

/// Cells are escaped here; callers pass raw text.
fn table(headers: &[&str], rows: &[Vec<String>], row_class: Option<&str>) -> String {
    let mut out = String::from("<table>\n<tr>");
    for h in headers {
        out.push_str(&format!("<th>{}</th>", escape(h)));
    }
    out.push_str("</tr>\n");

    for row in rows {
        match row_class {
            Some(class) => out.push_str(&format!("<tr class=\"{class}\">")),
            None => out.push_str("<tr>"),
        }
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

fn card(label: &str, value: impl std::fmt::Display) -> String {
    format!(
        "<div class=\"card\"><strong>{value}</strong><br>{}</div>",
        escape(label)
    )
}

fn status_line(status: &UpdateState, scheduler_running: bool) -> String {
    let last = match &status.timestamp {
        Some(ts) if status.success => format!("last update {ts}: {}", status.message),
        Some(ts) => format!("last update {ts} FAILED: {}", status.message),
        None => "no update yet".to_string(),
    };
    let scheduler = if scheduler_running {
        "auto-update on"
    } else {
        "auto-update off"
    };
    format!(
        "<p>{} | {} | <a href=\"/update\">update now</a> | \
         <a href=\"/export.xlsx\">download workbook</a> | <a href=\"/config\">configuration</a></p>\n",
        escape(&last),
        scheduler
    )
}

pub fn dashboard_page(
    snapshot: Option<&Snapshot>,
    status: &UpdateState,
    scheduler_running: bool,
) -> String {
    let mut body = status_line(status, scheduler_running);

    let Some(snapshot) = snapshot else {
        body.push_str("<p>No data yet. Run an update to load the calendar.</p>\n");
        return page("Paddock", &body);
    };

    let stats = &snapshot.stats;
    body.push_str(&format!(
        "<p>Window {} to {}, generated {}</p>\n",
        display(snapshot.window_start),
        display(snapshot.window_end),
        escape(&snapshot.last_updated())
    ));
    body.push_str(&card("events", stats.total_events));
    body.push_str(&card("confirmed", stats.confirmed_events));
    body.push_str(&card("unassigned", stats.unassigned_events));
    body.push_str(&card("reservations", stats.total_reservations));
    body.push_str(&card("remote", stats.remote_assignments));
    body.push_str(&card("conflicts", stats.conflicts));
    body.push_str(&card("alerts", stats.alerts));
    body.push('\n');

    body.push_str(&format!("<h2>Unassigned ({})</h2>\n", snapshot.unassigned_events.len()));
    let rows: Vec<Vec<String>> = snapshot
        .unassigned_events
        .iter()
        .map(|e| {
            vec![
                e.days_until.to_string(),
                e.name.clone(),
                e.city.clone(),
                e.category.clone(),
                e.coordinator.clone(),
                display(e.from_date),
            ]
        })
        .collect();
    body.push_str(&table(
        &["Days", "Event", "City", "SET", "Coordinator", "Start"],
        &rows,
        Some("danger"),
    ));

    body.push_str(&format!("<h2>Conflicts ({})</h2>\n", snapshot.conflicts.len()));
    let rows: Vec<Vec<String>> = snapshot
        .conflicts
        .iter()
        .map(|c| {
            vec![
                c.employee.clone(),
                format!("{} ({})", c.first.event_name, c.first.city),
                format!("{} ({})", c.second.event_name, c.second.city),
                format!("{} - {}", display(c.overlap_start), display(c.overlap_end)),
            ]
        })
        .collect();
    body.push_str(&table(&["Employee", "Event", "Overlaps with", "Overlap"], &rows, Some("warn")));

    body.push_str(&format!("<h2>Alerts ({})</h2>\n", snapshot.alerts.len()));
    let rows: Vec<Vec<String>> = snapshot
        .alerts
        .iter()
        .map(|a| {
            vec![
                a.days_until.to_string(),
                a.event_name.clone(),
                a.city.clone(),
                a.material
                    .as_ref()
                    .map(|m| format!("{} (ship {})", m.level, display(m.departure_date)))
                    .unwrap_or_default(),
                a.flight
                    .as_ref()
                    .map(|f| format!("{} ({}, {} days)", f.level, f.region, f.threshold_days))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    body.push_str(&table(&["Days", "Event", "City", "Material", "Flights"], &rows, None));

    body.push_str("<h2>Upcoming</h2>\n");
    let rows: Vec<Vec<String>> = snapshot
        .upcoming(UPCOMING_LIMIT)
        .map(|e| {
            vec![
                e.date_range(),
                e.name.clone(),
                e.city.clone(),
                e.category.clone(),
                e.staff_names().join(", "),
            ]
        })
        .collect();
    body.push_str(&table(&["Dates", "Event", "City", "SET", "Staff"], &rows, None));

    page("Paddock", &body)
}

pub fn config_page(cfg: &Config, configured: bool) -> String {
    let state = if configured {
        "Credentials are set. Submitting the form replaces them."
    } else {
        "No credentials yet."
    };
    let body = format!(
        "<p>{state}</p>\n\
         <form method=\"post\" action=\"/config\">\n\
         <p><label>Airtable token <input type=\"password\" name=\"airtable_token\"></label></p>\n\
         <p><label>Base id <input name=\"airtable_base_id\" value=\"{base}\"></label></p>\n\
         <p><label>Auto-update (minutes) <input name=\"auto_update_interval\" value=\"{interval}\"></label></p>\n\
         <p><button type=\"submit\">Save</button></p>\n\
         </form>\n<p><a href=\"/\">back to dashboard</a></p>\n",
        base = escape(&cfg.airtable.base_id),
        interval = cfg.server.auto_update_interval,
    );
    page("Paddock configuration", &body)
}

pub fn not_configured_page() -> String {
    page(
        "Paddock",
        "<p>The record store is not configured yet.</p>\n\
         <p><a href=\"/config\">Enter the Airtable credentials</a> to load the calendar.</p>\n",
    )
}
