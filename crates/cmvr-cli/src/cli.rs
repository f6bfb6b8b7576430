//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use cmvr_schemas::ValidationMode;
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// CMVR CLI - Normalize and validate compliance monitoring reports
///
/// Turns report state captured by the CMVR form screens into the canonical
/// backend DTO and checks DTOs against the backend report schema.
#[derive(Parser, Debug)]
#[command(
    name = "cmvr",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CMVR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: from config, else human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a report submission into the backend DTO
    Transform(TransformArgs),

    /// Validate a backend DTO against the report schema
    Validate(ValidateArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Submission envelope, or a bare report when --general-info is given
    /// (JSON or YAML; `-` reads stdin)
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// General info document; treats SUBMISSION as the bare report state
    #[arg(short, long, value_name = "FILE")]
    pub general_info: Option<PathBuf>,

    /// Override the creator id recorded in the DTO
    #[arg(long, value_name = "ID", env = "CMVR_CREATED_BY")]
    pub created_by: Option<String>,

    /// Write the DTO to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Validate the produced DTO before writing it
    #[arg(long)]
    pub validate: bool,

    /// Validation mode used with --validate
    #[arg(long, value_enum, default_value = "strict")]
    pub mode: ModeArg,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the DTO file (JSON or YAML)
    #[arg(value_name = "DTO")]
    pub dto: PathBuf,

    /// Apply the business rules on top of the schema
    #[arg(short, long)]
    pub strict: bool,

    /// Print the validated document
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize default configuration files
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Get a configuration value
    Get(ConfigGetArgs),

    /// Validate current configuration
    Validate,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Initialize user config (~/.config/cmvr/config.toml)
    #[arg(long)]
    pub user: bool,

    /// Initialize project config (.cmvr.toml)
    #[arg(long)]
    pub project: bool,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,

    /// Show only user configuration
    #[arg(long, conflicts_with = "project_only")]
    pub user_only: bool,

    /// Show only project configuration
    #[arg(long)]
    pub project_only: bool,
}

/// Arguments for config get
#[derive(Parser, Debug)]
pub struct ConfigGetArgs {
    /// Configuration key (e.g., created_by_id, output.format)
    pub key: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "value")]
    pub format: ConfigGetFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Configuration get output formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigGetFormat {
    /// Just the value
    Value,
    /// JSON formatted
    Json,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Validation mode as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Schema plus business rules
    Strict,
    /// Schema only
    Basic,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self, config: &Config) -> bool {
        !self.no_color && config.output.color && std::io::stdout().is_terminal()
    }

    /// The `-o` flag, falling back to `output.format` from config
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.output.unwrap_or_else(|| {
            OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Human)
        })
    }
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::Basic => ValidationMode::Basic,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
