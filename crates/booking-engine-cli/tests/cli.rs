use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn tutorbook() -> Command {
    Command::cargo_bin("tutorbook").unwrap()
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_resolve_date_later_this_week() {
    let value = stdout_json(tutorbook().args(["resolve-date", "friday", "--today", "2024-03-13"]));
    assert_eq!(value["date"], "2024-03-15");
    assert_eq!(value["day"], "friday");
}

#[test]
fn test_resolve_date_same_day() {
    let value = stdout_json(tutorbook().args(["resolve-date", "monday", "--today", "2024-03-11"]));
    assert_eq!(value["date"], "2024-03-11");
}

#[test]
fn test_resolve_date_rejects_unknown_day() {
    tutorbook()
        .args(["resolve-date", "funday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid weekday"));
}

#[test]
fn test_interval_literal_utc() {
    let value = stdout_json(tutorbook().args(["interval", "2024-03-15", "09:00-10:30"]));
    assert_eq!(value["startTime"], "2024-03-15T09:00:00.000Z");
    assert_eq!(value["endTime"], "2024-03-15T10:30:00.000Z");
}

#[test]
fn test_interval_overnight_rolls_forward() {
    let value = stdout_json(tutorbook().args(["interval", "2024-03-15", "23:00-01:00"]));
    assert_eq!(value["endTime"], "2024-03-16T01:00:00.000Z");
}

#[test]
fn test_slots_filters_booked_and_past() {
    let availability = json_file(r#"{"friday": ["14:00-15:00", "15:00-16:00"], "wednesday": ["09:00-10:00"]}"#);
    let booked = json_file(
        r#"[{"startTime": "2024-03-15T14:00:00Z", "endTime": "2024-03-15T15:00:00Z"}]"#,
    );
    let value = stdout_json(tutorbook().args([
        "slots",
        availability.path().to_str().unwrap(),
        "--booked",
        booked.path().to_str().unwrap(),
        "--now",
        "2024-03-13T12:00:00Z",
    ]));
    let slots = value.as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["day"], "friday");
    assert_eq!(slots[0]["slot"], "15:00-16:00");
    assert_eq!(slots[0]["startTime"], "2024-03-15T15:00:00.000Z");
}

#[test]
fn test_request_end_to_end() {
    let availability = json_file(r#"{"friday": ["14:00-15:00", "15:00-16:00"]}"#);
    let value = stdout_json(tutorbook().args([
        "request",
        "--tutor-id",
        "tutor-17",
        "--availability",
        availability.path().to_str().unwrap(),
        "--day",
        "friday",
        "--slot",
        "15:00-16:00",
        "--purpose",
        "Algebra help",
        "--now",
        "2024-03-13T10:00:00Z",
    ]));
    assert_eq!(
        value,
        serde_json::json!({
            "tutorId": "tutor-17",
            "purpose": "Algebra help",
            "startTime": "2024-03-15T15:00:00.000Z",
            "endTime": "2024-03-15T16:00:00.000Z"
        })
    );
}

#[test]
fn test_request_rejects_blank_purpose() {
    let availability = json_file(r#"{"friday": ["15:00-16:00"]}"#);
    tutorbook()
        .args([
            "request",
            "--tutor-id",
            "tutor-17",
            "--availability",
            availability.path().to_str().unwrap(),
            "--day",
            "friday",
            "--slot",
            "15:00-16:00",
            "--purpose",
            "  ",
            "--now",
            "2024-03-13T10:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("purpose is missing"));
}

#[test]
fn test_request_rejects_unlisted_slot() {
    let availability = json_file(r#"{"friday": ["15:00-16:00"]}"#);
    tutorbook()
        .args([
            "request",
            "--tutor-id",
            "tutor-17",
            "--availability",
            availability.path().to_str().unwrap(),
            "--day",
            "friday",
            "--slot",
            "09:00-10:00",
            "--purpose",
            "Essay review",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Slot unavailable"));
}

fn request_args<'a>(availability: &'a NamedTempFile, day: &'a str, slot: &'a str) -> Vec<&'a str> {
    vec![
        "request",
        "--tutor-id",
        "tutor-17",
        "--availability",
        availability.path().to_str().unwrap(),
        "--day",
        day,
        "--slot",
        slot,
        "--purpose",
        "Algebra help",
        "--now",
        "2024-03-13T10:00:00Z",
    ]
}

#[test]
fn test_request_summary_in_timezone() {
    let availability = json_file(r#"{"friday": ["15:00-16:00"]}"#);
    let mut args = request_args(&availability, "friday", "15:00-16:00");
    args.extend(["--timezone", "Europe/London"]);
    let value = stdout_json(tutorbook().args(args));
    assert_eq!(value["request"]["startTime"], "2024-03-15T15:00:00.000Z");
    assert_eq!(
        value["session"],
        "Friday, March 15, 2024, 3:00 PM to 4:00 PM GMT"
    );
}

#[test]
fn test_request_rejects_unknown_timezone() {
    let availability = json_file(r#"{"friday": ["15:00-16:00"]}"#);
    let mut args = request_args(&availability, "friday", "15:00-16:00");
    args.extend(["--timezone", "Mars/Olympus"]);
    tutorbook()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone 'Mars/Olympus'"));
}

#[test]
fn test_request_rejects_started_same_day_slot() {
    let availability = json_file(r#"{"wednesday": ["08:00-09:00"]}"#);
    tutorbook()
        .args(request_args(&availability, "wednesday", "08:00-09:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Slot in the past"));
}

#[test]
fn test_rust_log_directives_enable_library_debug() {
    let availability = json_file(r#"{"friday": ["15:00-16:00"]}"#);
    tutorbook()
        .args(request_args(&availability, "friday", "15:00-16:00"))
        .env("RUST_LOG", "booking_engine=debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("booking draft: tutor selected"));
}

#[test]
fn test_book_with_bad_config_fails() {
    let config = json_file("api_base_url = \"ftp://nowhere\"\n");
    tutorbook()
        .args([
            "book",
            "--config",
            config.path().to_str().unwrap(),
            "--tutor-id",
            "tutor-17",
            "--day",
            "friday",
            "--slot",
            "15:00-16:00",
            "--purpose",
            "Algebra help",
        ])
        .env_remove("TUTORBOOK_API_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
