//! Configuration management for the CLI
//!
//! Configuration is layered, later layers winning:
//! - Default values
//! - User file (`~/.config/cmvr/config.toml`)
//! - Project file (`.cmvr.toml`, searched upwards from the working directory)
//! - Environment variables (`CMVR_*`)
//!
//! An explicit `--config` file replaces both file layers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toml::Table;

/// Project config file name
pub const PROJECT_CONFIG_FILE: &str = ".cmvr.toml";

const OUTPUT_FORMATS: &[&str] = &["human", "json", "yaml", "json-pretty"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["compact", "full", "json"];

const DEFAULT_CONFIG_TOML: &str = r#"# CMVR configuration

# Creator id recorded in DTOs when a submission does not carry one
# created_by_id = "user-123"

# Run strict schema validation on every transformed report
validate_output = false

[output]
# human, json, yaml or json-pretty
format = "human"
color = true

[logging]
# trace, debug, info, warn or error
level = "warn"
# compact, full or json
format = "compact"
"#;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Creator id used when neither the submission nor `--created-by` gives one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,

    /// Validate every transformed DTO
    pub validate_output: bool,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            created_by_id: None,
            validate_output: false,
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a single TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let table = read_table(path)?;
        Self::from_table(table)
    }

    fn from_table(table: Table) -> Result<Self> {
        Ok(table.try_into()?)
    }

    /// Load configuration from a specific file or the default layers, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::from_file(path)?
            }
            None => {
                let user = Self::user_config_path().filter(|p| p.exists());
                let project = Self::find_project_config();
                Self::load_layers(user.as_deref(), project.as_deref())?
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge the user and project files, project keys winning
    pub fn load_layers(user: Option<&Path>, project: Option<&Path>) -> Result<Self> {
        let mut merged = Table::new();
        for path in [user, project].into_iter().flatten() {
            tracing::debug!(path = %path.display(), "Loading config layer");
            merge_tables(&mut merged, read_table(path)?);
        }
        Self::from_table(merged)
    }

    /// Apply `CMVR_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup("CMVR_OUTPUT_FORMAT") {
            self.output.format = format;
        }
        if let Some(level) = lookup("CMVR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CMVR_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(created_by) = lookup("CMVR_CREATED_BY").filter(|s| !s.trim().is_empty()) {
            self.created_by_id = Some(created_by);
        }
        if let Some(validate) = lookup("CMVR_VALIDATE_OUTPUT") {
            self.validate_output = validate == "1" || validate.eq_ignore_ascii_case("true");
        }
    }

    /// Check that enumerated settings hold known values
    pub fn validate(&self) -> Result<()> {
        check_one_of("output.format", &self.output.format, OUTPUT_FORMATS)?;
        check_one_of("logging.level", &self.logging.level, LOG_LEVELS)?;
        check_one_of("logging.format", &self.logging.format, LOG_FORMATS)?;
        if self
            .created_by_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(Error::config("created_by_id must not be blank"));
        }
        Ok(())
    }

    /// Get a configuration value by dotted key
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "created_by_id" => Ok(self.created_by_id.clone().unwrap_or_default()),
            "validate_output" => Ok(self.validate_output.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            "output.color" => Ok(self.output.color.to_string()),
            "logging.level" => Ok(self.logging.level.clone()),
            "logging.format" => Ok(self.logging.format.clone()),
            _ => Err(Error::config(format!("Unknown configuration key: {}", key))),
        }
    }

    /// `~/.config/cmvr/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("cmvr").join("config.toml"))
    }

    /// Nearest `.cmvr.toml` in the working directory or its ancestors
    pub fn find_project_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        find_upwards(&cwd, PROJECT_CONFIG_FILE)
    }

    /// Write the commented default config to `path`
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, DEFAULT_CONFIG_TOML)?;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<Table>()
        .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
}

/// Recursively overlay `overlay` onto `base`
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn find_upwards(start: &Path, file_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn check_one_of(key: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{} must be one of {}, got '{}'",
            key,
            allowed.join(", "),
            value
        )))
    }
}
