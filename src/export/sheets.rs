//! Tabular projection of a snapshot, shared by the xlsx and csv writers.

use chrono::NaiveDate;

use crate::models::stats::GroupStats;
use crate::models::category::category_color;
use crate::models::{Event, FlightLevel, MaterialLevel, Snapshot};
use crate::utils::date::display_short;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl Value {
    /// Plain-text rendering used by csv and the HTML view.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format!("{f:.1}"),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// `0xRRGGBB`
    Rgb(u32),
    Warning,
    Danger,
}

impl Fill {
    /// Parse a `#RRGGBB` colour.
    pub fn from_hex(hex: &str) -> Option<Fill> {
        u32::from_str_radix(hex.trim_start_matches('#'), 16)
            .ok()
            .map(Fill::Rgb)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: Value,
    pub fill: Option<Fill>,
}

impl Cell {
    pub fn filled(mut self, fill: Option<Fill>) -> Self {
        self.fill = fill;
        self
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string()).into()
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Value::Text(s).into()
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Value::Int(n).into()
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Value::Int(n as i64).into()
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Value::Float(f).into()
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d).into()
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell { value, fill: None }
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &'static str, headers: Vec<&'static str>) -> Self {
        Self {
            name,
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn push_filled(&mut self, row: Vec<Cell>, fill: Option<Fill>) {
        self.rows
            .push(row.into_iter().map(|c| c.filled(fill)).collect());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Immediate,
    Urgent,
    Pending,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Immediate => "IMMEDIATE",
            Urgency::Urgent => "URGENT",
            Urgency::Pending => "PENDING",
        }
    }

    fn fill(&self) -> Option<Fill> {
        match self {
            Urgency::Immediate => Some(Fill::Danger),
            Urgency::Urgent => Some(Fill::Warning),
            Urgency::Pending => None,
        }
    }
}

/// Urgency of an unstaffed event.
pub fn unassigned_urgency(days_left: i64) -> Urgency {
    if days_left <= 3 {
        Urgency::Immediate
    } else if days_left <= 7 {
        Urgency::Urgent
    } else {
        Urgency::Pending
    }
}

/// Level of a critical date.
pub fn critical_level(days_left: i64) -> Urgency {
    if days_left <= 2 {
        Urgency::Immediate
    } else {
        Urgency::Urgent
    }
}

fn category_fill(event: &Event) -> Option<Fill> {
    Fill::from_hex(&event.color)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn calendar_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Calendar",
        vec![
            "Event",
            "City",
            "SET",
            "Coordinator",
            "Start",
            "End",
            "Employee",
            "Employee from",
            "Employee to",
            "Remote",
            "Updated",
        ],
    );
    let updated = snapshot.last_updated();

    for event in &snapshot.events {
        let head = || -> Vec<Cell> {
            vec![
                event.name.as_str().into(),
                event.city.as_str().into(),
                Cell::from(event.category.as_str()).filled(category_fill(event)),
                event.coordinator.as_str().into(),
                event.from_date.into(),
                event.to_date.into(),
            ]
        };

        if event.assignments.is_empty() {
            let mut row = head();
            row.extend([
                Cell::from("UNASSIGNED"),
                "N/A".into(),
                "N/A".into(),
                "N/A".into(),
                updated.as_str().into(),
            ]);
            sheet.push(row);
            continue;
        }

        for a in &event.assignments {
            let mut row = head();
            row.extend([
                Cell::from(a.employee.as_str()),
                a.from_date.into(),
                a.to_date.into(),
                yes_no(a.remote).into(),
                updated.as_str().into(),
            ]);
            sheet.push(row);
        }
    }
    sheet
}

pub fn unassigned_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Unassigned",
        vec!["Urgency", "Days left", "Event", "City", "SET", "Coordinator", "Start", "Action"],
    );

    let mut rows: Vec<(Urgency, &Event)> = snapshot
        .unassigned_events
        .iter()
        .map(|e| (unassigned_urgency(e.days_until), e))
        .collect();
    rows.sort_by_key(|(urgency, _)| *urgency);

    for (urgency, event) in rows {
        sheet.push_filled(
            vec![
                urgency.label().into(),
                event.days_until.into(),
                event.name.as_str().into(),
                event.city.as_str().into(),
                event.category.as_str().into(),
                event.coordinator.as_str().into(),
                event.from_date.into(),
                "Assign staff".into(),
            ],
            urgency.fill(),
        );
    }
    sheet
}

pub fn summary_sheet(snapshot: &Snapshot) -> Sheet {
    let stats = &snapshot.stats;
    let mut sheet = Sheet::new("Summary", vec!["Metric", "Value", "State"]);

    let flagged = |n: usize, level: &'static str| if n > 0 { level } else { "OK" };
    let rows: [(&str, usize, &str); 7] = [
        ("Total events", stats.total_events, "INFO"),
        ("Confirmed events", stats.confirmed_events, "OK"),
        ("Unassigned events", stats.unassigned_events, flagged(stats.unassigned_events, "ALERT")),
        ("Total assignments", stats.total_reservations, "INFO"),
        ("Remote assignments", stats.remote_assignments, "INFO"),
        ("Staffing conflicts", stats.conflicts, flagged(stats.conflicts, "ALERT")),
        ("Operational alerts", stats.alerts, flagged(stats.alerts, "WATCH")),
    ];

    for (metric, value, state) in rows {
        let fill = match state {
            "ALERT" => Some(Fill::Danger),
            "WATCH" => Some(Fill::Warning),
            _ => None,
        };
        sheet.push(vec![metric.into(), value.into(), Cell::from(state).filled(fill)]);
    }
    sheet
}

pub fn critical_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Critical",
        vec!["Level", "Days", "Event", "City", "SET", "Coordinator", "Date"],
    );

    for c in &snapshot.stats.critical_dates {
        let level = critical_level(c.days_until);
        sheet.push_filled(
            vec![
                level.label().into(),
                c.days_until.into(),
                c.event_name.as_str().into(),
                c.city.as_str().into(),
                c.category.as_str().into(),
                c.coordinator.as_str().into(),
                c.from_date.into(),
            ],
            level.fill(),
        );
    }
    sheet
}

fn group_row(name: &str, group: &GroupStats, name_fill: Option<Fill>) -> Vec<Cell> {
    let state_fill = match group.state() {
        "ALERT" => Some(Fill::Danger),
        "WATCH" => Some(Fill::Warning),
        _ => None,
    };
    vec![
        Cell::from(name).filled(name_fill),
        group.total.into(),
        group.confirmed.into(),
        group.unassigned.into(),
        group.employees.into(),
        group.coverage().into(),
        Cell::from(group.state()).filled(state_fill),
    ]
}

pub fn coordinators_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Coordinators",
        vec![
            "Coordinator",
            "Total events",
            "Confirmed",
            "Unassigned",
            "Employees",
            "Efficiency %",
            "State",
        ],
    );
    for (name, group) in &snapshot.stats.by_coordinator {
        sheet.push(group_row(name, group, None));
    }
    sheet
}

pub fn sets_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "SETs",
        vec![
            "SET",
            "Total events",
            "Confirmed",
            "Unassigned",
            "Employees",
            "Coverage %",
            "State",
        ],
    );
    for (name, group) in &snapshot.stats.by_set {
        let fill = Fill::from_hex(category_color(name));
        sheet.push(group_row(name, group, fill));
    }
    sheet
}

pub fn conflicts_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Conflicts",
        vec![
            "Employee",
            "Event A",
            "City A",
            "SET A",
            "Dates A",
            "Event B",
            "City B",
            "SET B",
            "Dates B",
            "Overlap start",
            "Overlap end",
        ],
    );

    let dates = |from: NaiveDate, to: NaiveDate| format!("{} - {}", display_short(from), display_short(to));
    for c in &snapshot.conflicts {
        sheet.push_filled(
            vec![
                c.employee.as_str().into(),
                c.first.event_name.as_str().into(),
                c.first.city.as_str().into(),
                c.first.category.as_str().into(),
                dates(c.first.from_date, c.first.to_date).into(),
                c.second.event_name.as_str().into(),
                c.second.city.as_str().into(),
                c.second.category.as_str().into(),
                dates(c.second.from_date, c.second.to_date).into(),
                c.overlap_start.into(),
                c.overlap_end.into(),
            ],
            Some(Fill::Danger),
        );
    }
    sheet
}

pub fn alerts_sheet(snapshot: &Snapshot) -> Sheet {
    let mut sheet = Sheet::new(
        "Alerts",
        vec![
            "Days",
            "Event",
            "City",
            "Start",
            "Material",
            "Departure",
            "Days to departure",
            "Flights",
            "Region",
            "Threshold",
        ],
    );

    for a in &snapshot.alerts {
        let mut row: Vec<Cell> = vec![
            a.days_until.into(),
            a.event_name.as_str().into(),
            a.city.as_str().into(),
            a.from_date.into(),
        ];
        match &a.material {
            Some(m) => row.extend([
                Cell::from(m.level.to_string()),
                m.departure_date.into(),
                m.days_to_departure.into(),
            ]),
            None => row.extend([Cell::from("-"), "-".into(), "-".into()]),
        }
        match &a.flight {
            Some(f) => row.extend([
                Cell::from(f.level.to_string()),
                f.region.to_string().into(),
                f.threshold_days.into(),
            ]),
            None => row.extend([Cell::from("-"), "-".into(), "-".into()]),
        }

        let urgent = a
            .material
            .as_ref()
            .is_some_and(|m| m.level == MaterialLevel::Urgent)
            || a
                .flight
                .as_ref()
                .is_some_and(|f| f.level == FlightLevel::Critical);
        let fill = if urgent { Fill::Danger } else { Fill::Warning };
        sheet.push_filled(row, Some(fill));
    }
    sheet
}

/// All sheets in workbook order. Optional sheets are left out when empty.
pub fn render_sheets(snapshot: &Snapshot) -> Vec<Sheet> {
    let mut sheets = vec![calendar_sheet(snapshot)];

    let unassigned = unassigned_sheet(snapshot);
    if !unassigned.rows.is_empty() {
        sheets.push(unassigned);
    }

    sheets.push(summary_sheet(snapshot));

    let critical = critical_sheet(snapshot);
    if !critical.rows.is_empty() {
        sheets.push(critical);
    }

    sheets.push(coordinators_sheet(snapshot));
    sheets.push(sets_sheet(snapshot));

    for optional in [conflicts_sheet(snapshot), alerts_sheet(snapshot)] {
        if !optional.rows.is_empty() {
            sheets.push(optional);
        }
    }
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_buckets() {
        assert_eq!(unassigned_urgency(3), Urgency::Immediate);
        assert_eq!(unassigned_urgency(4), Urgency::Urgent);
        assert_eq!(unassigned_urgency(7), Urgency::Urgent);
        assert_eq!(unassigned_urgency(8), Urgency::Pending);
        assert_eq!(critical_level(2), Urgency::Immediate);
        assert_eq!(critical_level(3), Urgency::Urgent);
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(Fill::from_hex("#FF6B6B"), Some(Fill::Rgb(0xFF6B6B)));
        assert_eq!(Fill::from_hex("nope"), None);
    }
}
