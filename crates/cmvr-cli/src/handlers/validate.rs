//! Validation command handler

use super::utils::read_document;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use cmvr_schemas::{validate_report, ValidationMode};
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(_config, output), fields(file = %args.dto.display(), strict = args.strict))]
pub fn handle_validate(args: ValidateArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("file: {}", args.dto.display()));
    info!("Starting validation process");
    output.info(&format!("Validating report: {}", args.dto.display()))?;

    let document = read_document(&args.dto)?;

    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Basic
    };
    debug!(?mode, "Running validation");

    match validate_report(&document, mode) {
        Ok(()) => {
            info!("Validation passed");
            output.success(&format!("✓ Report is valid ({:?})", mode))?;

            if args.detailed {
                output.section("Report")?;
                output.data(&document)?;
            }
            Ok(())
        }
        Err(errors) => {
            warn!(errors = errors.len(), "Validation failed");
            output.validation_errors(&errors)?;

            if args.detailed {
                output.section("Failed Report")?;
                output.data(&document)?;
            }
            Err(errors.into())
        }
    }
}
