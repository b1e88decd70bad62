use predicates::str::contains;
use std::fs;

mod common;
use common::Workspace;

#[test]
fn test_export_xlsx_workbook() {
    let ws = Workspace::new();
    let out = ws.path("reports/calendar.xlsx");

    ws.cmd()
        .args(["export", "--format", "xlsx", "--file", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("XLSX export completed"));

    let bytes = fs::read(&out).expect("read exported xlsx");
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_export_csv_calendar_rows() {
    let ws = Workspace::new();
    let out = ws.path("calendar.csv");

    ws.cmd()
        .args(["export", "--format", "csv", "--file", out.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("Event,City,SET,Coordinator,Start,End,Employee"));
    assert!(content.contains("Monza ELMS,Monza,SET 5,Laura"));
    assert!(content.contains("UNASSIGNED,N/A,N/A,N/A"));
    assert!(content.contains("Ana Ruiz"));
    // one row per assignment plus the unassigned event
    assert_eq!(content.lines().count(), 1 + 4);
}

#[test]
fn test_export_json_snapshot() {
    let ws = Workspace::new();
    let out = ws.path("snapshot.json");

    ws.cmd()
        .args(["export", "--format", "json", "--file", out.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let json: serde_json::Value = serde_json::from_str(&content).expect("valid json");

    assert_eq!(json["events"].as_array().unwrap().len(), 4);
    assert_eq!(json["stats"]["total_events"], 4);
    assert_eq!(json["unassigned_events"][0]["id"], "evA");
    assert_eq!(json["conflicts"][0]["employee"], "Ana Ruiz");
    assert_eq!(json["today"], common::TODAY);
}

#[test]
fn test_export_existing_file_requires_confirmation() {
    let ws = Workspace::new();
    let out = ws.path("calendar.csv");
    fs::write(&out, "keep me").unwrap();

    ws.cmd()
        .args(["export", "--format", "csv", "--file", out.to_str().unwrap()])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("existing file not overwritten"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "keep me");

    ws.cmd()
        .args(["export", "--format", "csv", "--file", out.to_str().unwrap()])
        .write_stdin("y\n")
        .assert()
        .success();
    assert!(fs::read_to_string(&out).unwrap().contains("Monza ELMS"));
}

#[test]
fn test_export_force_overwrites_without_prompt() {
    let ws = Workspace::new();
    let out = ws.path("snapshot.json");
    fs::write(&out, "old").unwrap();

    ws.cmd()
        .args(["export", "--format", "json", "--file", out.to_str().unwrap(), "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&out).unwrap().contains("\"events\""));
}

#[test]
fn test_export_rejects_unknown_format() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["export", "--format", "pdf", "--file", "x.pdf"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'pdf'"));
}
