mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{TestWorkspace, fixture_path};

fn survey_csv() -> Command {
    Command::cargo_bin("survey-csv").expect("binary exists")
}

#[test]
fn sort_prints_headers_in_schema_order() {
    let workspace = TestWorkspace::new();
    let schema = workspace.gps_schema();
    survey_csv()
        .args([
            "sort",
            "-s",
            schema.to_str().unwrap(),
            "LONGITUDE,Note,Timestamp",
            "latitude",
        ])
        .assert()
        .success()
        .stdout("Note,Timestamp,latitude,LONGITUDE\n");
}

#[test]
fn columns_lists_resolved_and_canonical_names() {
    survey_csv()
        .args([
            "columns",
            "-s",
            fixture_path("magnetometer.yml").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("TMI"))
        .stdout(contains("tmi"))
        .stdout(contains("altitude"))
        .stdout(contains("time(%H:%M:%S%.3f)"));
}

#[test]
fn align_rewrites_fixture_into_canonical_order() {
    let workspace = TestWorkspace::new();
    let output = workspace.path().join("aligned.csv");
    survey_csv()
        .args([
            "align",
            "-s",
            fixture_path("magnetometer.yml").to_str().unwrap(),
            "-i",
            fixture_path("mag_2024-05-01.csv").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let aligned = fs::read_to_string(&output).expect("read aligned output");
    let mut lines = aligned.lines();
    assert_eq!(lines.next(), Some("Quality,Time,Lat,Lon,Altitude,TMI"));
    assert_eq!(
        lines.next(),
        Some("ok,10:15:30.000,56.946,24.105,12.5,51234.5")
    );
    assert_eq!(lines.count(), 2);
}

#[test]
fn check_accepts_valid_fixture() {
    survey_csv()
        .env("RUST_LOG", "survey_csv=info")
        .args([
            "check",
            "-s",
            fixture_path("magnetometer.yml").to_str().unwrap(),
            "-i",
            fixture_path("mag_2024-05-01.csv").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(contains("mag_2024-05-01.csv': 3 row(s), logged 2024-05-01"));
}

#[test]
fn check_failure_names_the_file_row_and_column() {
    let workspace = TestWorkspace::new();
    let schema = workspace.gps_schema();
    let input = workspace.write(
        "track.csv",
        "timestamp,Latitude,Longitude\n2024-05-01 10:00:00,56.9,24.1\n2024-05-01 10:00:01,north,24.1\n",
    );
    survey_csv()
        .args([
            "check",
            "-s",
            schema.to_str().unwrap(),
            "-i",
            input.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("track.csv"))
        .stderr(contains("Row 3, column 'Latitude': Cannot parse 'north' as float"));
}

#[test]
fn check_skip_invalid_drops_bad_rows() {
    let workspace = TestWorkspace::new();
    let schema = workspace.gps_schema();
    let input = workspace.write(
        "track.csv",
        "timestamp,Latitude,Longitude\n2024-05-01 10:00:00,56.9,24.1\nyesterday,56.8,24.1\n",
    );
    survey_csv()
        .env("RUST_LOG", "survey_csv=info")
        .args([
            "check",
            "-s",
            schema.to_str().unwrap(),
            "-i",
            input.to_str().unwrap(),
            "--skip-invalid",
        ])
        .assert()
        .success()
        .stderr(contains("'track.csv': 1 row(s), 1 skipped"));
}

#[test]
fn check_keep_going_reports_every_failed_file() {
    let workspace = TestWorkspace::new();
    let schema = workspace.gps_schema();
    let good = workspace.write("good.csv", "timestamp,Latitude,Longitude\n,1,2\n");
    let bad = workspace.write("bad.csv", "timestamp,Latitude,Longitude\nnow,1,2\n");
    let missing = workspace.path().join("missing.csv");
    survey_csv()
        .args([
            "check",
            "-s",
            schema.to_str().unwrap(),
            "-i",
            good.to_str().unwrap(),
            "-i",
            bad.to_str().unwrap(),
            "-i",
            missing.to_str().unwrap(),
            "--keep-going",
        ])
        .assert()
        .failure()
        .stderr(contains("2 of 3 file(s) failed: bad.csv, missing.csv"));
}

#[test]
fn empty_schema_is_rejected() {
    let workspace = TestWorkspace::new();
    let schema = workspace.write("empty.yml", "fields: []\n");
    survey_csv()
        .args(["sort", "-s", schema.to_str().unwrap(), "a"])
        .assert()
        .failure()
        .stderr(contains("does not declare any fields"));
}
