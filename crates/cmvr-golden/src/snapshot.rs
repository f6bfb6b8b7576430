//! Expected-output snapshots stored beside each fixture

use crate::{GoldenError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of a fixture's expected output
pub const EXPECTED_FILE: &str = "expected.json";

const SNAPSHOT_VERSION: &str = "1.0.0";

/// Expected DTO for one fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fixture id, `category/name`
    pub name: String,
    pub metadata: SnapshotMetadata,
    pub content: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: String,
    pub created_at: String,
    pub updated_at: String,
    pub description: Option<String>,
}

/// Reads and writes `expected.json` files under a root directory
pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

impl SnapshotManager {
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.snapshot_path(name);

        if !path.exists() {
            return Err(GoldenError::CorpusError(format!(
                "Snapshot '{}' not found at {}",
                name,
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(snapshot)?;
        content.push('\n');
        fs::write(&path, content)?;

        Ok(())
    }

    /// Replace the expected content, keeping the creation metadata
    pub fn update(&self, name: &str, new_content: Value) -> Result<()> {
        let mut snapshot = self.load(name)?;
        snapshot.content = new_content;
        snapshot.metadata.updated_at = Utc::now().to_rfc3339();
        self.save(&snapshot)
    }

    pub fn create(&self, name: &str, content: Value, description: Option<String>) -> Result<Snapshot> {
        let now = Utc::now().to_rfc3339();

        let snapshot = Snapshot {
            name: name.to_string(),
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION.to_string(),
                created_at: now.clone(),
                updated_at: now,
                description,
            },
            content,
        };

        self.save(&snapshot)?;
        Ok(snapshot)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }

    /// Ids of every fixture that has an expected output
    pub fn list(&self) -> Result<Vec<String>> {
        let mut snapshots = Vec::new();

        if !self.snapshot_dir.exists() {
            return Ok(snapshots);
        }

        for entry in WalkDir::new(&self.snapshot_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || !path.file_name().is_some_and(|n| n == EXPECTED_FILE) {
                continue;
            }
            let id = path
                .parent()
                .and_then(|dir| dir.strip_prefix(&self.snapshot_dir).ok())
                .map(|rel| {
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/")
                });
            if let Some(id) = id {
                snapshots.push(id);
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshot_dir.join(name).join(EXPECTED_FILE)
    }

    /// Copy the current expectation aside before overwriting it
    pub fn backup(&self, name: &str) -> Result<()> {
        let source = self.snapshot_path(name);
        if !source.exists() {
            return Ok(());
        }
        let backup = source.with_file_name(format!("expected.{}.bak", Utc::now().timestamp()));
        fs::copy(source, backup)?;
        Ok(())
    }
}

/// Sort keys, trim strings and round floats so comparisons ignore noise
pub fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), normalize_json(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_json).collect()),
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .and_then(|f| serde_json::Number::from_f64((f * 1e6).round() / 1e6))
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// Remove dot-path fields (arrays fan out) from a value
pub fn apply_ignores(value: &mut Value, ignore_fields: &[String]) {
    for field_path in ignore_fields {
        let parts: Vec<&str> = field_path.split('.').filter(|s| !s.is_empty()).collect();
        remove_path(value, &parts);
    }
}

fn remove_path(value: &mut Value, parts: &[&str]) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) if rest.is_empty() => {
            map.remove(*first);
        }
        Value::Object(map) => {
            if let Some(next) = map.get_mut(*first) {
                remove_path(next, rest);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| remove_path(item, parts)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_create_load_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());
        let content = json!({"createdById": "u", "ecc": []});

        let snapshot = manager
            .create("permits/ecc-only", content.clone(), Some("ECC only".to_string()))
            .unwrap();
        assert_eq!(snapshot.metadata.version, "1.0.0");
        assert!(temp_dir.path().join("permits/ecc-only/expected.json").exists());

        let loaded = manager.load("permits/ecc-only").unwrap();
        assert_eq!(loaded.content, content);
        assert_eq!(manager.list().unwrap(), vec!["permits/ecc-only".to_string()]);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());
        let created = manager.create("a/b", json!({"year": 2023}), None).unwrap();

        manager.backup("a/b").unwrap();
        manager.update("a/b", json!({"year": 2024})).unwrap();

        let loaded = manager.load("a/b").unwrap();
        assert_eq!(loaded.content, json!({"year": 2024}));
        assert_eq!(loaded.metadata.created_at, created.metadata.created_at);
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());
        assert!(!manager.exists("nope/nothing"));
        assert!(matches!(manager.load("nope/nothing"), Err(GoldenError::CorpusError(_))));
    }

    #[test]
    fn test_normalize_json() {
        let input = json!({
            "year": 2024,
            "companyName": "  Acme  ",
            "eqpl": {"limit": 50.00000004, "action": "45"}
        });

        let normalized = normalize_json(&input);
        let keys: Vec<_> = normalized.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["companyName", "eqpl", "year"]);
        assert_eq!(normalized["companyName"], "Acme");
        assert_eq!(normalized["eqpl"]["limit"], json!(50.0));
        assert_eq!(normalized["year"], json!(2024));
    }

    #[test]
    fn test_apply_ignores_fans_out_over_arrays() {
        let mut value = json!({
            "createdById": "u-1",
            "attachments": [{"name": "a.png", "uri": "file:///a"}, {"name": "b.png"}]
        });

        apply_ignores(&mut value, &["createdById".to_string(), "attachments.uri".to_string()]);

        assert_eq!(value, json!({"attachments": [{"name": "a.png"}, {"name": "b.png"}]}));
    }
}
