//! Runs fixtures through the normalizer and compares against snapshots

use crate::{
    corpus::{CorpusManager, TestCase},
    diff::DiffEngine,
    snapshot::{apply_ignores, SnapshotManager},
    GoldenConfig, GoldenError, Result,
};
use cmvr_schemas::{validate_report, ValidationMode};
use colored::*;
use regex::Regex;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub error: Option<String>,
    pub diff: Option<String>,
    pub duration_ms: u64,
    /// The expected output was written or rewritten
    pub updated: bool,
}

impl TestResult {
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(error) = &self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(diff) = &self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Expected output updated".yellow());
        }
    }
}

/// What executing one fixture produced
struct Outcome {
    passed: bool,
    error: Option<String>,
    diff: Option<String>,
    updated: bool,
}

impl Outcome {
    fn pass() -> Self {
        Self { passed: true, error: None, diff: None, updated: false }
    }
}

pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    snapshot_manager: SnapshotManager,
}

impl GoldenTestRunner {
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        let snapshot_manager = SnapshotManager::new(&config.snapshot_dir);

        Self {
            config,
            corpus_manager,
            snapshot_manager,
        }
    }

    /// Run one fixture by id (`category/name`)
    pub fn run_test(&self, test_name: &str) -> Result<TestResult> {
        let test_path = self
            .config
            .corpus_dir
            .join(test_name)
            .join(crate::corpus::TEST_FILE);
        let test_case = self.corpus_manager.load_test_case(&test_path)?;
        let result = self.run_case(&test_case);

        if self.config.verbose {
            result.print(true);
        }

        if result.passed {
            Ok(result)
        } else {
            Err(GoldenError::TestFailed(format!(
                "'{}': {}",
                test_name,
                result.error.as_deref().unwrap_or("unknown error")
            )))
        }
    }

    fn run_case(&self, test_case: &TestCase) -> TestResult {
        let start = Instant::now();
        let outcome = self.execute_test(test_case).unwrap_or_else(|e| Outcome {
            passed: false,
            error: Some(e.to_string()),
            diff: None,
            updated: false,
        });

        TestResult {
            name: test_case.id(),
            passed: outcome.passed,
            error: outcome.error,
            diff: outcome.diff,
            duration_ms: start.elapsed().as_millis() as u64,
            updated: outcome.updated,
        }
    }

    /// Run every enabled fixture whose id contains `pattern` (`*` for all)
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let tests = self.corpus_manager.discover_tests()?;
        let tests = self.corpus_manager.filter_enabled(tests);
        let selected: Vec<_> = self
            .corpus_manager
            .filter_by_tags(tests, &self.config.tags)
            .into_iter()
            .filter(|t| pattern == "*" || t.id().contains(pattern))
            .collect();

        if selected.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No fixtures found matching pattern '{}'",
                pattern
            )));
        }

        println!("Running {} golden fixtures...\n", selected.len());

        let results: Vec<TestResult> = selected
            .iter()
            .map(|test_case| {
                let result = self.run_case(test_case);
                result.print(self.config.verbose);
                result
            })
            .collect();

        let failed = results.iter().filter(|r| !r.passed).count();
        let passed = results.len() - failed;

        println!("\n{}", "=== Golden Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            passed.to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} fixture(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    fn execute_test(&self, test_case: &TestCase) -> Result<Outcome> {
        if !test_case.metadata.enabled {
            return Ok(Outcome::pass());
        }

        let expectations = &test_case.expectations;
        let produced = test_case.input.to_submission().normalize();

        if !expectations.should_succeed {
            return match produced {
                Ok(_) => Err(GoldenError::TestFailed(
                    "normalization succeeded but the fixture expects a failure".to_string(),
                )),
                Err(e) => {
                    check_error_pattern(expectations.error_pattern.as_deref(), &e.to_string())?;
                    Ok(Outcome::pass())
                }
            };
        }

        let actual = serde_json::to_value(produced?)?;

        if self.config.validate_output && expectations.validate_schema {
            validate_report(&actual, ValidationMode::Strict)?;
        }

        self.compare_with_snapshot(test_case, actual)
    }

    fn compare_with_snapshot(&self, test_case: &TestCase, actual: Value) -> Result<Outcome> {
        let name = test_case.id();

        if !self.snapshot_manager.exists(&name) {
            if self.config.create_missing || self.config.update_snapshots {
                self.snapshot_manager
                    .create(&name, actual, Some(test_case.metadata.description.clone()))?;
                return Ok(Outcome { updated: true, ..Outcome::pass() });
            }
            return Err(GoldenError::SnapshotMismatch(format!(
                "no expected output for '{}'; run with UPDATE_GOLDEN=1 to create it",
                name
            )));
        }

        let snapshot = self.snapshot_manager.load(&name)?;

        let mut diff_engine = DiffEngine::new(self.config.diff_options.clone());
        for volatile in &test_case.expectations.volatile_fields {
            diff_engine.add_volatile_pattern(&volatile.path, &volatile.pattern)?;
        }

        let mut expected = snapshot.content;
        let mut compared = actual.clone();
        apply_ignores(&mut expected, &test_case.expectations.ignore_fields);
        apply_ignores(&mut compared, &test_case.expectations.ignore_fields);

        let diff = diff_engine.compare(&expected, &compared);
        if diff.matches {
            return Ok(Outcome::pass());
        }

        if self.config.update_snapshots {
            self.snapshot_manager.backup(&name)?;
            self.snapshot_manager.update(&name, actual)?;
            return Ok(Outcome {
                diff: Some(diff.diff_output),
                updated: true,
                ..Outcome::pass()
            });
        }

        Ok(Outcome {
            passed: false,
            error: Some(format!("output differs from expected.json: {}", diff.summary.describe())),
            diff: Some(diff.diff_output),
            updated: false,
        })
    }

    pub fn init_corpus(&self) -> Result<()> {
        self.corpus_manager.init_corpus()
    }

    pub fn list_tests(&self) -> Result<Vec<String>> {
        let tests = self.corpus_manager.discover_tests()?;
        Ok(tests.iter().map(TestCase::id).collect())
    }
}

fn check_error_pattern(pattern: Option<&str>, message: &str) -> Result<()> {
    let Some(pattern) = pattern else {
        return Ok(());
    };
    let regex = Regex::new(pattern)
        .map_err(|e| GoldenError::CorpusError(format!("Invalid error_pattern '{}': {}", pattern, e)))?;
    if regex.is_match(message) {
        Ok(())
    } else {
        Err(GoldenError::TestFailed(format!(
            "error '{}' does not match /{}/",
            message, pattern
        )))
    }
}
