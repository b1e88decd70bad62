use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{Workspace, paddock};

#[test]
fn test_help_lists_commands() {
    paddock()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("refresh").and(contains("serve")).and(contains("staff")));
}

#[test]
fn test_init_creates_database_and_keeps_config() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("(kept)").and(contains("initialization completed")));

    assert!(ws.database().exists());
}

#[test]
fn test_init_writes_missing_config() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.config()).unwrap();

    ws.cmd()
        .args(["--db", ws.database().to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(contains("(created)"));

    assert!(ws.config().exists());
}

#[test]
fn test_refresh_writes_workbook_and_logs() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("refresh")
        .assert()
        .success()
        .stdout(contains("Calendar updated"));

    assert!(ws.workbook().exists());

    ws.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("SUCCESS").and(contains("[events: 4, unassigned: 1]")));
}

#[test]
fn test_log_is_empty_before_first_refresh() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("No refresh has been logged yet"));
}

#[test]
fn test_refresh_without_credentials_fails() {
    let ws = Workspace::new();

    ws.online_cmd()
        .arg("refresh")
        .assert()
        .failure()
        .stderr(contains("Not configured").and(contains("airtable.token")));
}

#[test]
fn test_list_unassigned_only_shows_unstaffed_events() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["list", "--unassigned"])
        .assert()
        .success()
        .stdout(contains("Monza ELMS").and(contains("Spa WEC").not()));
}

#[test]
fn test_list_all_skips_events_without_dates() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(
            contains("COTA WEC")
                .and(contains("Ana Ruiz"))
                .and(contains("No dates yet").not()),
        );
}

#[test]
fn test_list_filters_by_set() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["list", "--set", "set 3"])
        .assert()
        .success()
        .stdout(contains("Portimao Ferrari").and(contains("Monza ELMS").not()));
}

#[test]
fn test_conflicts_report_overlapping_bookings() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("conflicts")
        .assert()
        .success()
        .stdout(
            contains("Ana Ruiz")
                .and(contains("Spa WEC (Spa)"))
                .and(contains("Portimao Ferrari (Portimao)"))
                .and(contains("22/03 - 22/03")),
        );
}

#[test]
fn test_alerts_include_material_and_flight_levels() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("alerts")
        .assert()
        .success()
        .stdout(
            contains("Monza ELMS")
                .and(contains("URGENT ship by"))
                .and(contains("Outside Europe")),
        );
}

#[test]
fn test_staff_excludes_booked_and_generic_entries() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["staff", "--from", "2026-03-20", "--to", "2026-03-21"])
        .assert()
        .success()
        .stdout(
            contains("Ben Costa")
                .and(contains("Carla Vidal"))
                .and(contains("Ana Ruiz").not())
                .and(contains("operations").not()),
        );
}

#[test]
fn test_staff_filters_by_role() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["staff", "--from", "2026-03-20", "--to", "2026-03-21", "--role", "tech"])
        .assert()
        .success()
        .stdout(contains("Carla Vidal").and(contains("Ben Costa").not()));
}

#[test]
fn test_staff_rejects_bad_dates() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["staff", "--from", "20/03/2026", "--to", "2026-03-21"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));

    ws.cmd()
        .args(["staff", "--from", "2026-03-22", "--to", "2026-03-21"])
        .assert()
        .failure()
        .stderr(contains("Invalid date range"));
}

#[test]
fn test_config_set_and_print() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "--set", "server.port=8081", "--set", "airtable.token=patSECRET123"])
        .assert()
        .success()
        .stdout(contains("server.port updated"));

    ws.cmd()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(
            contains("port: 8081")
                .and(contains("patS"))
                .and(contains("SECRET123").not()),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "--set", "server.colour=blue"])
        .assert()
        .failure()
        .stderr(contains("unknown key"));

    ws.cmd()
        .args(["config", "--set", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(contains("KEY=VALUE"));
}

#[test]
fn test_invalid_today_override_fails() {
    let ws = Workspace::new();

    common::paddock()
        .arg("--config")
        .arg(ws.config())
        .args(["--today", "tomorrow", "list"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format: tomorrow"));
}
