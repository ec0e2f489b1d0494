#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn carlog_cmd(data: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("carlog"));
    cmd.env("CARLOG_DATA_DIR", data.as_os_str())
        .env_remove("CARLOG_CURRENCY")
        .env_remove("CARLOG_UPCOMING_DAYS")
        .args(["--config", data.join("absent.toml").to_str().unwrap()]);
    cmd
}

fn read_json(data: &Path, key: &str) -> serde_json::Value {
    let text = fs::read_to_string(data.join(format!("{}.json", key))).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn add_vehicle(data: &Path, make: &str) -> String {
    carlog_cmd(data)
        .args(["vehicle", "add", "--make", make, "--model", "Corolla"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vehicle added"));

    let vehicles = read_json(data, "vehicles");
    let added = vehicles
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["make"] == make)
        .unwrap();
    added["id"].as_str().unwrap().to_string()
}

fn add_fill(data: &Path, date: &str, mileage: &str, liters: &str, cost: &str) {
    carlog_cmd(data)
        .args([
            "fuel", "add", "--date", date, "--mileage", mileage, "--liters", liters, "--cost",
            cost,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuel record added"));
}

#[test]
fn test_first_vehicle_becomes_active() {
    let temp = TempDir::new().unwrap();
    let id = add_vehicle(temp.path(), "Toyota");

    assert_eq!(read_json(temp.path(), "activeVehicle"), serde_json::json!(id));

    add_vehicle(temp.path(), "Honda");
    assert_eq!(read_json(temp.path(), "activeVehicle"), serde_json::json!(id));
}

#[test]
fn test_records_need_an_active_vehicle() {
    let temp = TempDir::new().unwrap();

    carlog_cmd(temp.path())
        .args(["fuel", "add", "--mileage", "100", "--liters", "10", "--cost", "20"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Select a vehicle first"))
        .stderr(predicate::str::contains("No active vehicle"));
}

#[test]
fn test_dashboard_shows_consumption() {
    let temp = TempDir::new().unwrap();
    add_vehicle(temp.path(), "Toyota");
    add_fill(temp.path(), "2024-01-01", "1000", "40", "80");
    add_fill(temp.path(), "2024-01-15", "1400", "40", "80");

    carlog_cmd(temp.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Toyota Corolla"))
        .stdout(predicate::str::contains("10.00 km/L"))
        .stdout(predicate::str::contains("160.00 SAR"));
}

#[test]
fn test_naked_invocation_without_vehicle() {
    let temp = TempDir::new().unwrap();

    carlog_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No active vehicle"));
}

#[test]
fn test_vehicle_delete_needs_confirmation_and_cascades() {
    let temp = TempDir::new().unwrap();
    let id = add_vehicle(temp.path(), "Toyota");
    add_fill(temp.path(), "2024-01-01", "1000", "40", "80");

    // No terminal and no --yes: declined.
    carlog_cmd(temp.path())
        .args(["vehicle", "remove", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing deleted"));
    assert_eq!(read_json(temp.path(), "fuel").as_array().unwrap().len(), 1);

    carlog_cmd(temp.path())
        .args(["vehicle", "remove", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vehicle deleted"));

    assert_eq!(read_json(temp.path(), "vehicles"), serde_json::json!([]));
    assert_eq!(read_json(temp.path(), "fuel"), serde_json::json!([]));
    assert_eq!(read_json(temp.path(), "activeVehicle"), serde_json::Value::Null);
}

#[test]
fn test_unknown_id_fails() {
    let temp = TempDir::new().unwrap();
    add_vehicle(temp.path(), "Toyota");

    carlog_cmd(temp.path())
        .args(["fuel", "remove", "zzzz", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fuel record not found"));
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    add_vehicle(source.path(), "Toyota");
    add_fill(source.path(), "2024-03-01", "5000", "35.5", "71");

    let export_file = source.path().join("export.json");
    carlog_cmd(source.path())
        .args(["export", export_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 records"));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_file).unwrap()).unwrap();
    assert!(exported.get("exportDate").is_some());

    carlog_cmd(target.path())
        .args(["import", export_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 records"));

    assert_eq!(read_json(target.path(), "vehicles"), exported["vehicles"]);
    assert_eq!(read_json(target.path(), "fuel"), exported["fuel"]);
}

#[test]
fn test_import_rejects_non_object() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.json");
    fs::write(&file, "[1, 2, 3]").unwrap();

    carlog_cmd(temp.path())
        .args(["import", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));
}

#[test]
fn test_backup_and_restore() {
    let temp = TempDir::new().unwrap();
    add_vehicle(temp.path(), "Toyota");

    carlog_cmd(temp.path())
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backed up 1 records"));

    add_vehicle(temp.path(), "Honda");
    assert_eq!(read_json(temp.path(), "vehicles").as_array().unwrap().len(), 2);

    carlog_cmd(temp.path())
        .args(["restore", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup restored"));
    assert_eq!(read_json(temp.path(), "vehicles").as_array().unwrap().len(), 1);
}

#[test]
fn test_theme_toggle_persists() {
    let temp = TempDir::new().unwrap();

    carlog_cmd(temp.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));

    carlog_cmd(temp.path())
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    assert_eq!(read_json(temp.path(), "theme"), serde_json::json!("dark"));
}

#[test]
fn test_fuel_list_shows_per_fill_consumption() {
    let temp = TempDir::new().unwrap();
    add_vehicle(temp.path(), "Toyota");
    add_fill(temp.path(), "2024-01-01", "1000", "40", "80");
    add_fill(temp.path(), "2024-01-15", "1500", "50", "100");

    carlog_cmd(temp.path())
        .args(["fuel", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("km/L"))
        .stdout(predicate::str::contains("10.00"));
}

#[test]
fn test_invalid_amounts_are_rejected_before_storing() {
    let temp = TempDir::new().unwrap();
    add_vehicle(temp.path(), "Toyota");

    carlog_cmd(temp.path())
        .args(["fuel", "add", "--liters", "NaN", "--cost=-50", "--mileage", "1000"])
        .assert()
        .failure();
    carlog_cmd(temp.path())
        .args(["part", "add", "--name", "Filter", "--price", "10", "--quantity", "0"])
        .assert()
        .failure();

    assert!(!temp.path().join("fuel.json").exists());
    assert!(!temp.path().join("parts.json").exists());
}
