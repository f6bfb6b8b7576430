//! Shared utilities for command handlers

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path that stands for standard input
pub const STDIN_PATH: &str = "-";

/// Whether a path names a YAML document
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("yaml") || s.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Read a JSON or YAML document; `-` reads JSON from stdin
pub fn read_document(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        fs::read_to_string(path)?
    };
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read document");

    parse_document(path, &content)
}

/// Parse document text, picking the format from the path's extension
pub fn parse_document(path: &Path, content: &str) -> Result<Value> {
    if is_yaml(path) {
        serde_yaml::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Write a value as YAML or pretty JSON, by extension
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
