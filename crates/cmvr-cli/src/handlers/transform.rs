//! Transform command handler

use super::utils::{read_document, write_document, STDIN_PATH};
use crate::cli::TransformArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use cmvr_core::ReportSubmission;
use cmvr_schemas::{validate_report, ValidationMode};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Handle the transform command
#[instrument(skip_all, fields(file = %args.submission.display()))]
pub fn handle_transform(args: TransformArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details(
        "transform_command",
        &format!("file: {}", args.submission.display()),
    );

    if args.general_info.as_deref().is_some_and(|p| p.as_os_str() == STDIN_PATH)
        && args.submission.as_os_str() == STDIN_PATH
    {
        return Err(Error::invalid_args(
            "only one of SUBMISSION and --general-info can read stdin",
        ));
    }

    output.info(&format!("Reading submission: {}", args.submission.display()))?;
    let document = read_document(&args.submission)?;
    let submission = build_submission(document, args.general_info.as_deref())?;
    let submission = resolve_creator(submission, args.created_by.as_deref(), config);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let mut logged = submission.general_info.clone();
        redaction::redact_json_value(&mut logged);
        debug!(general_info = %logged, created_by = %submission.created_by_id, "Normalizing submission");
    }

    if submission.created_by_id.is_empty() {
        output.warning("No creator id given; createdById will be empty")?;
    }

    let spinner = output.spinner("Normalizing report");
    let normalized = submission.normalize();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let dto = normalized?;

    if args.validate || config.validate_output {
        let mode = ValidationMode::from(args.mode);
        let value = serde_json::to_value(&dto)?;
        if let Err(errors) = validate_report(&value, mode) {
            output.validation_errors(&errors)?;
            return Err(errors.into());
        }
        output.success(&format!("✓ DTO passes {:?} validation", mode))?;
    }

    match &args.save_to {
        Some(path) => {
            write_document(path, &dto)?;
            output.success(&format!("✓ Saved DTO to {}", path.display()))?;
        }
        None => output.report(&dto)?,
    }

    info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        permits = dto.ecc.len() + dto.isag.len() + dto.epep.len(),
        "Transform finished"
    );
    Ok(())
}

/// Envelope from the main document, or bare report plus general info
fn build_submission(document: Value, general_info: Option<&Path>) -> Result<ReportSubmission> {
    match general_info {
        Some(path) => {
            let general = read_document(path)?;
            if !general.is_object() && !general.is_null() {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "general info object".to_string(),
                });
            }
            Ok(ReportSubmission::new(document, general, ""))
        }
        None => Ok(ReportSubmission::from_value(document)?),
    }
}

/// `--created-by` wins; config only fills an empty id
fn resolve_creator(
    submission: ReportSubmission,
    flag: Option<&str>,
    config: &Config,
) -> ReportSubmission {
    if let Some(id) = flag {
        return submission.with_created_by(id);
    }
    match &config.created_by_id {
        Some(id) if submission.created_by_id.is_empty() => submission.with_created_by(id.clone()),
        _ => submission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn envelope() -> Value {
        json!({
            "currentReport": {"eccInfo": {"permitHolder": "Acme Mining", "eccNumber": "ECC-001"}},
            "generalInfo": {"companyName": "Acme"},
            "createdById": "user-1"
        })
    }

    #[test]
    fn test_envelope_submission() {
        let submission = build_submission(envelope(), None).unwrap();
        assert_eq!(submission.created_by_id, "user-1");
        assert_eq!(submission.general_info["companyName"], "Acme");
    }

    #[test]
    fn test_bare_report_with_general_info_file() {
        let dir = TempDir::new().unwrap();
        let general = dir.path().join("general.yaml");
        std::fs::write(&general, "companyName: Acme\nyear: 2024\n").unwrap();

        let report = json!({"eccInfo": {"eccNumber": "ECC-9"}});
        let submission = build_submission(report.clone(), Some(&general)).unwrap();
        assert_eq!(submission.current_report, report);
        assert_eq!(submission.general_info, json!({"companyName": "Acme", "year": 2024}));
        assert_eq!(submission.created_by_id, "");
    }

    #[test]
    fn test_general_info_must_be_an_object() {
        let dir = TempDir::new().unwrap();
        let general = dir.path().join("general.json");
        std::fs::write(&general, "[1, 2]").unwrap();

        let err = build_submission(json!({}), Some(&general)).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_envelope_without_report_is_core_error() {
        let err = build_submission(json!({"generalInfo": {}}), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_creator_precedence() {
        let mut config = Config::default();
        config.created_by_id = Some("config-user".to_string());

        let from_envelope = build_submission(envelope(), None).unwrap();
        assert_eq!(resolve_creator(from_envelope.clone(), None, &config).created_by_id, "user-1");
        assert_eq!(
            resolve_creator(from_envelope, Some("flag-user"), &config).created_by_id,
            "flag-user"
        );

        let anonymous = ReportSubmission::new(json!({}), json!({}), "");
        assert_eq!(resolve_creator(anonymous, None, &config).created_by_id, "config-user");
    }
}
