//! Fixture discovery and loading

use crate::{GoldenError, Result};
use cmvr_core::ReportSubmission;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of a fixture definition
pub const TEST_FILE: &str = "test.json";

/// One fixture: a submission and what normalizing it must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub category: String,
    pub input: TestInput,
    #[serde(default)]
    pub expectations: TestExpectations,
    pub metadata: TestMetadata,
}

impl TestCase {
    /// `category/name`, which is also the fixture's directory
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

/// The submission envelope; either part may name a sibling `.json` file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestInput {
    pub current_report: Value,
    #[serde(default)]
    pub general_info: Value,
    #[serde(default)]
    pub created_by_id: String,
}

impl TestInput {
    pub fn to_submission(&self) -> ReportSubmission {
        let general_info = if self.general_info.is_null() {
            json!({})
        } else {
            self.general_info.clone()
        };
        ReportSubmission::new(self.current_report.clone(), general_info, self.created_by_id.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExpectations {
    /// False when normalization must fail, e.g. for an empty report
    #[serde(default = "default_true")]
    pub should_succeed: bool,

    /// Regex the error message must match when `should_succeed` is false
    pub error_pattern: Option<String>,

    /// Dot paths removed from both sides before comparing
    #[serde(default)]
    pub ignore_fields: Vec<String>,

    #[serde(default)]
    pub volatile_fields: Vec<VolatileFieldSpec>,

    /// Run strict schema validation on the output
    #[serde(default = "default_true")]
    pub validate_schema: bool,
}

impl Default for TestExpectations {
    fn default() -> Self {
        Self {
            should_succeed: true,
            error_pattern: None,
            ignore_fields: Vec::new(),
            volatile_fields: Vec::new(),
            validate_schema: true,
        }
    }
}

/// A string field masked when it matches `pattern`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatileFieldSpec {
    pub path: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMetadata {
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lower runs first
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    100
}

/// Reads fixtures from a corpus directory
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Every `test.json` under the corpus, by priority then id
    pub fn discover_tests(&self) -> Result<Vec<TestCase>> {
        let mut tests = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(tests);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.file_name().is_some_and(|n| n == TEST_FILE) {
                match self.load_test_case(path) {
                    Ok(test_case) => tests.push(test_case),
                    Err(e) => eprintln!("Warning: skipping fixture {}: {}", path.display(), e),
                }
            }
        }

        tests.sort_by(|a, b| {
            a.metadata
                .priority
                .cmp(&b.metadata.priority)
                .then_with(|| a.id().cmp(&b.id()))
        });

        Ok(tests)
    }

    /// Load a fixture, resolving file references next to it
    pub fn load_test_case(&self, path: &Path) -> Result<TestCase> {
        let content = fs::read_to_string(path)?;
        let mut test_case: TestCase = serde_json::from_str(&content)?;

        let test_dir = path.parent().ok_or_else(|| {
            GoldenError::CorpusError(format!("fixture {} has no parent directory", path.display()))
        })?;

        resolve_file_reference(test_dir, &mut test_case.input.current_report)?;
        resolve_file_reference(test_dir, &mut test_case.input.general_info)?;

        Ok(test_case)
    }

    pub fn filter_by_tags(&self, tests: Vec<TestCase>, tags: &[String]) -> Vec<TestCase> {
        if tags.is_empty() {
            return tests;
        }
        tests
            .into_iter()
            .filter(|t| tags.iter().any(|tag| t.metadata.tags.contains(tag)))
            .collect()
    }

    pub fn filter_enabled(&self, tests: Vec<TestCase>) -> Vec<TestCase> {
        tests.into_iter().filter(|t| t.metadata.enabled).collect()
    }

    /// Create the category directories and one sample fixture
    pub fn init_corpus(&self) -> Result<()> {
        for dir in ["permits", "sections", "edge-cases", "regression"] {
            fs::create_dir_all(self.corpus_dir.join(dir))?;
        }
        self.create_sample_test()
    }

    fn create_sample_test(&self) -> Result<()> {
        let test_dir = self.corpus_dir.join("permits/ecc-sample");
        fs::create_dir_all(&test_dir)?;

        let test_case = TestCase {
            name: "ecc-sample".to_string(),
            category: "permits".to_string(),
            input: TestInput {
                current_report: json!({
                    "eccInfo": {
                        "isNA": false,
                        "permitHolder": "Sample Holder",
                        "eccNumber": "ECC-000",
                        "dateOfIssuance": "2024-01-01"
                    }
                }),
                general_info: json!({"companyName": "Sample Co.", "quarter": "1st Quarter", "year": "2024"}),
                created_by_id: "sample-user".to_string(),
            },
            expectations: TestExpectations::default(),
            metadata: TestMetadata {
                description: "Single ECC primary record".to_string(),
                tags: vec!["permits".to_string(), "smoke".to_string()],
                enabled: true,
                priority: 1,
            },
        };

        fs::write(test_dir.join(TEST_FILE), serde_json::to_string_pretty(&test_case)?)?;
        Ok(())
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(categories);
        }

        for entry in fs::read_dir(&self.corpus_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    categories.push(name.to_string());
                }
            }
        }

        categories.sort();
        Ok(categories)
    }
}

/// Replace a `"something.json"` string with the parsed file contents
fn resolve_file_reference(dir: &Path, slot: &mut Value) -> Result<()> {
    let Value::String(filename) = slot else {
        return Ok(());
    };
    if !filename.ends_with(".json") {
        return Ok(());
    }
    let content = fs::read_to_string(dir.join(filename.as_str()))?;
    *slot = serde_json::from_str(&content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(name: &str, category: &str) -> TestCase {
        TestCase {
            name: name.to_string(),
            category: category.to_string(),
            input: TestInput {
                current_report: json!({}),
                general_info: Value::Null,
                created_by_id: String::new(),
            },
            expectations: TestExpectations::default(),
            metadata: TestMetadata {
                description: name.to_string(),
                tags: vec![],
                enabled: true,
                priority: 1,
            },
        }
    }

    #[test]
    fn test_init_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());
        manager.init_corpus().unwrap();

        assert!(temp_dir.path().join("permits").is_dir());
        assert!(temp_dir.path().join("edge-cases").is_dir());
        assert!(temp_dir.path().join("permits/ecc-sample/test.json").exists());
        assert_eq!(
            manager.list_categories().unwrap(),
            vec!["edge-cases", "permits", "regression", "sections"]
        );
    }

    #[test]
    fn test_discover_tests() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());
        manager.init_corpus().unwrap();

        let tests = manager.discover_tests().unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].id(), "permits/ecc-sample");
        assert_eq!(tests[0].input.created_by_id, "sample-user");
    }

    #[test]
    fn test_file_references_are_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("sections/from-file");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("report.json"), r#"{"quarter": "Q3"}"#).unwrap();
        fs::write(
            dir.join(TEST_FILE),
            r#"{
                "name": "from-file",
                "category": "sections",
                "input": {"currentReport": "report.json", "createdById": "u"},
                "metadata": {"description": "report read from a sibling file"}
            }"#,
        )
        .unwrap();

        let manager = CorpusManager::new(temp_dir.path());
        let test = manager.load_test_case(&dir.join(TEST_FILE)).unwrap();
        assert_eq!(test.input.current_report, json!({"quarter": "Q3"}));
        assert!(test.expectations.should_succeed);
        assert_eq!(test.metadata.priority, 100);
        assert_eq!(test.input.to_submission().general_info, json!({}));
    }

    #[test]
    fn test_filters() {
        let manager = CorpusManager::new(".");
        let mut disabled = fixture("b", "sections");
        disabled.metadata.enabled = false;
        disabled.metadata.tags = vec!["water".to_string()];
        let tests = vec![fixture("a", "permits"), disabled];

        assert_eq!(manager.filter_by_tags(tests.clone(), &["water".to_string()]).len(), 1);
        assert_eq!(manager.filter_enabled(tests).len(), 1);
    }
}
