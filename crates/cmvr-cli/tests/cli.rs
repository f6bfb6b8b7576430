//! End-to-end tests for the `cmvr` binary
//!
//! Every command runs in a scratch directory with `HOME` pointed inside it,
//! so no real user or project config is picked up.

use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cmvr(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cmvr"));
    command.args(args).current_dir(dir).env("HOME", dir).env("NO_COLOR", "1");
    for var in [
        "CMVR_CONFIG",
        "CMVR_OUTPUT_FORMAT",
        "CMVR_LOG_LEVEL",
        "CMVR_LOG_FORMAT",
        "CMVR_LOG_FILE",
        "CMVR_CREATED_BY",
        "CMVR_VALIDATE_OUTPUT",
        "RUST_LOG",
    ] {
        command.env_remove(var);
    }
    command.output().expect("failed to run cmvr")
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn envelope() -> Value {
    json!({
        "currentReport": {
            "eccInfo": {
                "isNA": false,
                "permitHolder": "Acme Mining",
                "eccNumber": "ECC-001",
                "dateOfIssuance": "01/01/2024"
            }
        },
        "generalInfo": {"companyName": "Acme", "quarter": "1st Quarter", "year": "2024"},
        "createdById": "user-123"
    })
}

#[test]
fn transform_prints_dto_as_json() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "submission.json", &envelope());

    let output = cmvr(dir.path(), &["-o", "json", "transform", "submission.json", "--validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let dto: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(dto["createdById"], "user-123");
    assert_eq!(dto["year"], 2024);
    assert_eq!(
        dto["ecc"],
        json!([{"permitHolderName": "Acme Mining", "eccNumber": "ECC-001", "dateOfIssuance": "01/01/2024"}])
    );
    assert_eq!(dto["complianceMonitoringReport"], json!({"complaintsVerificationAndManagement": []}));
}

#[test]
fn transform_bare_report_with_general_info_and_override() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "report.json", &envelope()["currentReport"]);
    std::fs::write(dir.path().join("general.yaml"), "companyName: Acme\nyear: 2023\n").unwrap();

    let output = cmvr(
        dir.path(),
        &[
            "-o",
            "json",
            "transform",
            "report.json",
            "--general-info",
            "general.yaml",
            "--created-by",
            "cli-user",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let dto: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(dto["createdById"], "cli-user");
    assert_eq!(dto["companyName"], "Acme");
    assert_eq!(dto["year"], 2023);
}

#[test]
fn transform_saves_yaml_and_validate_accepts_it() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "submission.json", &envelope());

    let output = cmvr(dir.path(), &["transform", "submission.json", "--save-to", "out/dto.yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved DTO to out/dto.yaml"));

    let saved: Value = serde_yaml::from_str(&std::fs::read_to_string(dir.path().join("out/dto.yaml")).unwrap()).unwrap();
    assert_eq!(saved["companyName"], "Acme");

    let output = cmvr(dir.path(), &["validate", "out/dto.yaml", "--strict"]);
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Report is valid"));
}

#[test]
fn transform_of_null_report_fails_with_core_exit_code() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "submission.json",
        &json!({"currentReport": null, "generalInfo": {}, "createdById": "u"}),
    );

    let output = cmvr(dir.path(), &["transform", "submission.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Report is empty"));
}

#[test]
fn missing_input_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = cmvr(dir.path(), &["transform", "nope.json"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("File not found"));
}

#[test]
fn strict_validation_reports_rule_violations() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "submission.json", &envelope());
    let output = cmvr(dir.path(), &["-o", "json", "transform", "submission.json"]);
    let mut dto: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    dto["year"] = json!(1850);
    write_json(dir.path(), "dto.json", &dto);

    let basic = cmvr(dir.path(), &["validate", "dto.json"]);
    assert!(basic.status.success(), "stdout: {}", stdout(&basic));

    let strict = cmvr(dir.path(), &["-o", "json", "validate", "dto.json", "--strict"]);
    assert_eq!(strict.status.code(), Some(7));
    let errors: Value = serde_json::from_str(stdout(&strict).trim()).unwrap();
    assert_eq!(errors["errors"][0]["path"], "/year");
    assert!(stderr(&strict).contains("Validation failed with 1 error(s)"));
}

#[test]
fn project_config_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".cmvr.toml"),
        "created_by_id = \"project-user\"\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = cmvr(dir.path(), &["config", "get", "output.format"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "json");

    let mut submission = envelope();
    submission["createdById"] = json!("");
    write_json(dir.path(), "submission.json", &submission);
    let output = cmvr(dir.path(), &["transform", "submission.json"]);
    let dto: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(dto["createdById"], "project-user");
}

#[test]
fn config_init_then_validate() {
    let dir = TempDir::new().unwrap();

    let output = cmvr(dir.path(), &["config", "init", "--project"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join(".cmvr.toml").is_file());

    let output = cmvr(dir.path(), &["config", "init", "--project"]);
    assert!(stdout(&output).contains("already exists"));

    let output = cmvr(dir.path(), &["config", "validate"]);
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Configuration is valid"));
}

#[test]
fn bad_config_value_fails_validation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".cmvr.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();

    let output = cmvr(dir.path(), &["config", "validate"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    let output = cmvr(dir.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("cmvr"));
}
