// Tests for output formatting
//
// These tests check the human layouts for DTOs and validation errors and
// that machine formats stay free of decoration.

use super::*;
use cmvr_core::transform_to_backend_dto;
use cmvr_schemas::Violation;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer whose bytes stay readable after being boxed into an OutputWriter
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, false, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_dto() -> BackendReportDto {
    let report = json!({
        "eccInfo": {"permitHolder": "Acme Mining", "eccNumber": "ECC-001"},
        "complaintsVerificationAndManagement": {"isNA": true}
    });
    let general = json!({"companyName": "Acme", "quarter": "1st Quarter", "year": "2024"});
    transform_to_backend_dto(&report, &general, "user-1").unwrap()
}

fn sample_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(ValidationError::rule(
        "/year",
        "1850 is outside 1900..=2100",
        Violation::new("year_range", "a value between 1900 and 2100", "1850"),
    ));
    errors.add(ValidationError::new("", "missing property 'ecc'"));
    errors
}

#[test]
fn test_report_human_summary() {
    let formatted = OutputFormat::Human.format_report(&sample_dto()).unwrap();

    assert!(formatted.contains("Company: Acme"));
    assert!(formatted.contains("Period: 1st Quarter 2024"));
    assert!(formatted.contains("Permits: ECC ×1"));
    assert!(formatted.contains("Complaints: 1 entry"));
    assert!(formatted.contains("Attachments: 0 files"));
    assert!(formatted.contains("\"eccNumber\": \"ECC-001\""));
}

#[test]
fn test_report_machine_formats_are_plain() {
    let dto = sample_dto();

    let json_text = OutputFormat::Json.format_report(&dto).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(parsed["createdById"], "user-1");
    assert!(!json_text.contains('\n'));

    let yaml_text = OutputFormat::Yaml.format_report(&dto).unwrap();
    let parsed: serde_json::Value = serde_yaml::from_str(&yaml_text).unwrap();
    assert_eq!(parsed["ecc"][0]["permitHolderName"], "Acme Mining");
}

#[test]
fn test_validation_errors_human() {
    let formatted = OutputFormat::Human.format_validation_errors(&sample_errors()).unwrap();

    assert!(formatted.contains("Validation Failed - 2 Error(s)"));
    assert!(formatted.contains("1. 📍 Path: /year"));
    assert!(formatted.contains("Rule: year_range"));
    assert!(formatted.contains("Actual: 1850"));
    assert!(formatted.contains("2. 📍 Path: /\n"));
}

#[test]
fn test_validation_errors_json() {
    let formatted = OutputFormat::JsonPretty.format_validation_errors(&sample_errors()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(parsed["errors"][0]["path"], "/year");
    assert_eq!(parsed["errors"][0]["schema_violations"][0]["rule"], "year_range");
}

#[test]
fn test_messages_suppressed_outside_human_format() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.info("working").unwrap();
    out.success("done").unwrap();
    out.warning("careful").unwrap();
    out.section("Details").unwrap();
    out.data(&json!({"ok": true})).unwrap();

    assert_eq!(buffer.contents(), "{\"ok\":true}\n");
}

#[test]
fn test_plain_human_messages() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.info("Reading submission").unwrap();
    out.warning("No creator id").unwrap();
    out.error("Broken").unwrap();
    out.section("Report").unwrap();

    assert_eq!(
        buffer.contents(),
        "INFO: Reading submission\nWARNING: No creator id\nERROR: Broken\n\n=== Report ===\n"
    );
}

#[test]
fn test_quiet_keeps_warnings_and_data() {
    let buffer = SharedBuffer::default();
    let mut out = OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(buffer.clone()));
    out.info("hidden").unwrap();
    out.success("hidden").unwrap();
    out.warning("shown").unwrap();
    out.data(&json!("value")).unwrap();

    assert_eq!(buffer.contents(), "WARNING: shown\n\"value\"\n");
}

#[test]
fn test_table_layout() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.table(
        &["Source", "Status"],
        vec![
            vec!["user".to_string(), "missing".to_string()],
            vec!["project".to_string(), "found".to_string()],
        ],
    )
    .unwrap();

    let lines: Vec<String> = buffer.contents().lines().map(String::from).collect();
    assert_eq!(lines[0], "Source  │ Status ");
    assert_eq!(lines[1], "────────┼────────");
    assert_eq!(lines[2], "user    │ missing");
    assert_eq!(lines[3], "project │ found  ");
}
