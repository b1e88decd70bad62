#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TODAY: &str = "2026-03-01";

pub fn paddock() -> Command {
    cargo_bin_cmd!("paddock")
}

/// Scratch workspace: config file, database, workbook and JSON fixtures.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace { dir };
        fs::create_dir_all(ws.fixtures()).expect("fixtures dir");
        write_fixtures(&ws.fixtures());
        ws.write_config("");
        ws
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> PathBuf {
        self.path("paddock.yaml")
    }

    pub fn database(&self) -> PathBuf {
        self.path("paddock.sqlite")
    }

    pub fn workbook(&self) -> PathBuf {
        self.path("out/calendar.xlsx")
    }

    pub fn fixtures(&self) -> PathBuf {
        self.path("fixtures")
    }

    /// `token` may be empty: fixture mode needs no credentials.
    pub fn write_config(&self, token: &str) {
        let yaml = format!(
            "database: {}\nairtable:\n  token: \"{}\"\nexport:\n  workbook_path: {}\nlog:\n  level: warn\n",
            self.database().display(),
            token,
            self.workbook().display(),
        );
        fs::write(self.config(), yaml).expect("write config");
    }

    /// Command wired to this workspace in offline fixture mode.
    pub fn cmd(&self) -> Command {
        let mut cmd = paddock();
        cmd.env_remove("PADDOCK_AIRTABLE_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config())
            .arg("--fixtures")
            .arg(self.fixtures())
            .args(["--today", TODAY]);
        cmd
    }

    /// Same, but talking to the (unconfigured) record store.
    pub fn online_cmd(&self) -> Command {
        let mut cmd = paddock();
        cmd.env_remove("PADDOCK_AIRTABLE_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config())
            .args(["--today", TODAY]);
        cmd
    }
}

fn write_json(path: &Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(&value).expect("json")).expect("write fixture");
}

/// Four events around 2026-03-01:
/// - Monza ELMS: confirmed, nobody booked, in 4 days
/// - Spa WEC and Portimao Ferrari: Ana booked on both, overlapping on 22/03
/// - COTA WEC: Ben booked, outside Europe
pub fn write_fixtures(dir: &Path) {
    write_json(
        &dir.join("events.json"),
        json!({ "records": [
            { "id": "evA", "fields": {
                "From": "2026-03-05", "To": "2026-03-06",
                "EVENT NAME": "Monza ELMS", "EVENT": "ELMS Monza", "EVENT CITY": "Monza",
                "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)": ["ELMS"],
                "Name (from Event Coordinator)": ["Laura"],
                "CONFIRMED": true
            }},
            { "id": "evB", "fields": {
                "From": "2026-03-20", "To": "2026-03-22",
                "EVENT NAME": "Spa WEC", "EVENT CITY": "Spa",
                "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)": ["FIA WEC"],
                "Name (from Event Coordinator)": ["Laura"],
                "CONFIRMED": true, "PEOPLE RESERVED": ["emp1"]
            }},
            { "id": "evC", "fields": {
                "From": "2026-03-22", "To": "2026-03-24",
                "EVENT NAME": "Portimao Ferrari", "EVENT CITY": "Portimao",
                "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)": ["Ferrari Challenge Europe"],
                "Name (from Event Coordinator)": ["Marc"],
                "CONFIRMED": true, "PEOPLE RESERVED": ["emp1"]
            }},
            { "id": "evD", "fields": {
                "From": "2026-04-20", "To": "2026-04-22",
                "EVENT NAME": "COTA WEC", "EVENT CITY": "Austin",
                "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)": ["FIA WEC"],
                "CONFIRMED": true, "PEOPLE RESERVED": ["emp2"]
            }},
            { "id": "evX", "fields": { "EVENT NAME": "No dates yet" } }
        ]}),
    );

    write_json(
        &dir.join("employees.json"),
        json!({ "records": [
            { "id": "emp1", "fields": { "Name": "Ana Ruiz", "EMAIL": "ana@example.com", "POSITION": "Technician" } },
            { "id": "emp2", "fields": { "Name": "Ben Costa", "POSITION": "Engineer" } },
            { "id": "emp3", "fields": { "Name": "Carla Vidal", "POSITION": "Technician" } },
            { "id": "emp4", "fields": { "Name": "operations@example.com", "POSITION": "Technician" } }
        ]}),
    );

    write_json(
        &dir.join("reservations.json"),
        json!({ "records": [
            { "id": "res1", "fields": {
                "EVENT": ["evB"], "Employee directory": ["emp1"],
                "Name (from Employee directory)": ["Ana Ruiz"], "Name (from EVENT)": ["FIA WEC Spa"],
                "FROM": "2026-03-19", "TO": "2026-03-22"
            }},
            { "id": "res2", "fields": {
                "EVENT": ["evC"], "Employee directory": ["emp1"],
                "Name (from Employee directory)": ["Ana Ruiz"], "Name (from EVENT)": ["Ferrari Challenge"],
                "FROM": "2026-03-22", "TO": "2026-03-24", "REMOTE": true
            }},
            { "id": "res3", "fields": {
                "EVENT": ["evD"], "Employee directory": ["emp2"],
                "Name (from Employee directory)": ["Ben Costa"], "Name (from EVENT)": ["FIA WEC Austin"],
                "FROM": "2026-04-19", "TO": "2026-04-23"
            }}
        ]}),
    );
}
