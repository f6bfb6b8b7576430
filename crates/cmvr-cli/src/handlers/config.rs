//! Configuration command handlers

use crate::cli::{
    ConfigAction, ConfigArgs, ConfigFormat, ConfigGetArgs, ConfigGetFormat, ConfigInitArgs,
    ConfigShowArgs,
};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::PathBuf;

/// Environment variables that override configuration
const ENV_OVERRIDES: &[&str] = &[
    "CMVR_CONFIG",
    "CMVR_OUTPUT_FORMAT",
    "CMVR_LOG_LEVEL",
    "CMVR_LOG_FORMAT",
    "CMVR_LOG_FILE",
    "CMVR_CREATED_BY",
    "CMVR_VALIDATE_OUTPUT",
];

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Get(get_args) => handle_config_get(get_args, config, output),
        ConfigAction::Validate => handle_config_validate(config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    // Neither flag means both files
    let init_user = args.user || !args.project;
    let init_project = args.project || !args.user;

    let mut targets: Vec<(&str, PathBuf)> = Vec::new();
    if init_user {
        let path = Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?;
        targets.push(("User", path));
    }
    if init_project {
        targets.push(("Project", PathBuf::from(PROJECT_CONFIG_FILE)));
    }

    let mut created_any = false;
    for (label, path) in targets {
        if path.exists() && !args.force {
            output.warning(&format!("{} config already exists at {}", label, path.display()))?;
            continue;
        }
        Config::write_default(&path)?;
        output.success(&format!("✓ Created {} config at {}", label.to_lowercase(), path.display()))?;
        created_any = true;
    }

    if created_any {
        output.info("Configuration files created with default values.")?;
    }

    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let config_to_show = if args.user_only {
        match Config::user_config_path().filter(|p| p.exists()) {
            Some(path) => Config::from_file(&path)?,
            None => {
                output.warning("No user config found")?;
                return Ok(());
            }
        }
    } else if args.project_only {
        match Config::find_project_config() {
            Some(path) => Config::from_file(&path)?,
            None => {
                output.warning("No project config found")?;
                return Ok(());
            }
        }
    } else {
        config.clone()
    };

    let content = match args.format {
        ConfigFormat::Toml => toml::to_string_pretty(&config_to_show)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config_to_show)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&config_to_show)?,
    };

    output.writeln(content.trim_end())
}

/// Handle config get subcommand
fn handle_config_get(args: ConfigGetArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let value = config.get_value(&args.key)?;

    match args.format {
        ConfigGetFormat::Value => output.writeln(&value),
        ConfigGetFormat::Json => {
            let json_value = serde_json::json!({
                "key": args.key,
                "value": value
            });
            output.writeln(&serde_json::to_string_pretty(&json_value)?)
        }
    }
}

/// Handle config validate subcommand
fn handle_config_validate(config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info("Validating configuration...")?;

    if let Err(e) = config.validate() {
        output.error(&format!("✗ Configuration validation failed: {}", e))?;
        return Err(e);
    }
    output.success("✓ Configuration is valid")?;

    output.section("Configuration Sources")?;
    let mut rows = Vec::new();
    if let Some(user_path) = Config::user_config_path() {
        let status = if user_path.exists() { "found" } else { "missing" };
        rows.push(vec!["user".to_string(), user_path.display().to_string(), status.to_string()]);
    }
    match Config::find_project_config() {
        Some(path) => rows.push(vec!["project".to_string(), path.display().to_string(), "found".to_string()]),
        None => rows.push(vec!["project".to_string(), PROJECT_CONFIG_FILE.to_string(), "missing".to_string()]),
    }
    output.table(&["Source", "Path", "Status"], rows)?;

    let active: Vec<Vec<String>> = ENV_OVERRIDES
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|value| vec![var.to_string(), value]))
        .collect();
    if !active.is_empty() {
        output.section("Active Environment Variables")?;
        output.table(&["Variable", "Value"], active)?;
    }

    Ok(())
}
