//! Output formatting and writing utilities
//!
//! This module formats results in JSON, YAML or a human-readable layout,
//! with specialized rendering for backend DTOs and validation errors.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use cmvr_core::BackendReportDto;
use cmvr_schemas::{ValidationError, ValidationErrors};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Formatting of results in one output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a DTO; the human layout adds a short summary header
    fn format_report(&self, dto: &BackendReportDto) -> Result<String>;

    /// Format validation errors with their violations
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_report(&self, dto: &BackendReportDto) -> Result<String> {
        match self {
            OutputFormat::Human => format_report_human(dto),
            _ => self.format(dto),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_errors_human(errors)),
            _ => self.format(errors),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut redacted = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut redacted);
        trace!(data = %redacted, "Outputting data");

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a DTO with report-specific formatting
    pub fn report(&mut self, dto: &BackendReportDto) -> Result<()> {
        let formatted = self.format.format_report(dto)?;
        self.writeln(formatted.trim_end())
    }

    /// Write validation errors with specialized formatting
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(&row_str)?;
        }

        Ok(())
    }
}

/// Spinner style shared by long-running commands
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Format a DTO for human reading: summary lines, then the JSON body
fn format_report_human(dto: &BackendReportDto) -> Result<String> {
    let mut output = String::new();

    output.push_str("═══ Backend Report ═══\n\n");
    output.push_str(&format!("  Company: {}\n", dto.company_name));
    output.push_str(&format!("  Project: {}\n", dto.project_name));
    let period = match dto.year {
        Some(year) => format!("{} {}", dto.quarter, year),
        None => dto.quarter.clone(),
    };
    output.push_str(&format!("  Period: {}\n", period.trim()));

    let permits = [
        ("ECC", dto.ecc.len()),
        ("ISAG", dto.isag.len()),
        ("EPEP", dto.epep.len()),
        ("RCF", dto.rcf.len()),
        ("MTF", dto.mtf.len()),
        ("FMRDF", dto.fmrdf.len()),
    ];
    let listed: Vec<String> = permits
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| format!("{} ×{}", name, count))
        .collect();
    if listed.is_empty() {
        output.push_str("  Permits: none\n");
    } else {
        output.push_str(&format!("  Permits: {}\n", listed.join(", ")));
    }
    output.push_str(&format!(
        "  Complaints: {}\n",
        count_label(dto.compliance_monitoring_report.complaints_verification_and_management.len(), "entry")
    ));
    output.push_str(&format!("  Attachments: {}\n\n", count_label(dto.attachments.len(), "file")));

    output.push_str(&serde_json::to_string_pretty(dto)?);
    output.push('\n');
    Ok(output)
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    let mut output = String::new();

    output.push_str(&format!("❌ Validation Failed - {} Error(s)\n\n", errors.len()));

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}", i + 1, format_validation_error_human(error)));
    }

    output
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> String {
    let mut output = String::new();

    let path = if error.path.is_empty() { "/" } else { &error.path };
    output.push_str(&format!("📍 Path: {}\n", path));
    output.push_str(&format!("   💬 Message: {}\n", error.message));

    for violation in &error.schema_violations {
        output.push_str(&format!("   • Rule: {}\n", violation.rule));
        output.push_str(&format!("     Expected: {}\n", violation.expected));
        output.push_str(&format!("     Actual: {}\n", violation.actual));
    }
    output.push('\n');

    output
}
