//! CMVR CLI - Command-line interface for compliance monitoring reports
//!
//! This is the main entry point for the `cmvr` binary, providing commands
//! for normalizing report submissions into backend DTOs and validating them.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    let cli = Cli::parse_args();

    let code = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => {
            let use_color = cli.use_color(&config);
            control::set_override(use_color);

            // Held until the command finishes so buffered file logs are flushed
            let _log_guard = match init_logging(&cli, &config) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {}", e);
                    None
                }
            };

            match run(cli, &config, use_color) {
                Ok(()) => 0,
                Err(e) => report_error(&e, use_color),
            }
        }
        Err(e) => report_error(&e, !cli.no_color),
    };

    process::exit(code);
}

fn report_error(e: &error::Error, use_color: bool) -> i32 {
    eprintln!("{}", error::format_error(e, use_color));

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    e.exit_code()
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output_format(config), use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, config, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system from config, `-v` flags and environment
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_settings(&config.logging);
    logging_config.apply_verbosity(cli.verbosity_level());
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["cmvr", "-vv", "transform", "submission.json"]);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(matches!(cli.command, Commands::Transform(_)));

        let cli = Cli::parse_from(["cmvr", "--quiet", "config", "validate"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Config(_)));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["cmvr", "-v", "-q", "validate", "dto.json"]).is_err());
    }
}
