//! Golden fixture runner for the CMVR report normalizer
//!
//! Each fixture is a report submission plus the backend DTO it must
//! normalize to. Fixtures live under `golden-corpus/<category>/<name>/`
//! as `test.json` and `expected.json`. Set `UPDATE_GOLDEN=1` to rewrite
//! expectations from the current output.

pub mod corpus;
pub mod diff;
pub mod runner;
pub mod snapshot;

use std::path::PathBuf;
use thiserror::Error;

pub use corpus::{CorpusManager, TestCase};
pub use diff::{DiffEngine, DiffOptions};
pub use runner::{GoldenTestRunner, TestResult};
pub use snapshot::{Snapshot, SnapshotManager};

#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Normalization error: {0}")]
    Normalize(#[from] cmvr_core::Error),

    #[error("Output failed schema validation: {0}")]
    Validation(#[from] cmvr_schemas::ValidationErrors),

    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Test failed: {0}")]
    TestFailed(String),
}

pub type Result<T> = std::result::Result<T, GoldenError>;

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Configuration for a golden run
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Root directory of the fixture corpus
    pub corpus_dir: PathBuf,

    /// Where `expected.json` files live; the corpus itself by default
    pub snapshot_dir: PathBuf,

    pub update_snapshots: bool,

    pub create_missing: bool,

    /// Run strict schema validation over every produced DTO
    pub validate_output: bool,

    pub diff_options: DiffOptions,

    /// Batch runs keep only fixtures carrying one of these tags; empty keeps all
    pub tags: Vec<String>,

    pub verbose: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        let update_snapshots = env_flag("UPDATE_GOLDEN").unwrap_or(false);

        Self {
            corpus_dir: PathBuf::from("../../golden-corpus"),
            snapshot_dir: PathBuf::from("../../golden-corpus"),
            update_snapshots,
            create_missing: update_snapshots,
            validate_output: true,
            diff_options: DiffOptions::default(),
            tags: Vec::new(),
            verbose: false,
        }
    }
}

impl GoldenConfig {
    /// Defaults overridden by `GOLDEN_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(corpus_dir) = std::env::var("GOLDEN_CORPUS_DIR") {
            config.snapshot_dir = PathBuf::from(&corpus_dir);
            config.corpus_dir = PathBuf::from(corpus_dir);
        }

        if let Ok(snapshot_dir) = std::env::var("GOLDEN_SNAPSHOT_DIR") {
            config.snapshot_dir = PathBuf::from(snapshot_dir);
        }

        if let Some(verbose) = env_flag("GOLDEN_VERBOSE") {
            config.verbose = verbose;
        }

        if let Some(validate) = env_flag("GOLDEN_VALIDATE") {
            config.validate_output = validate;
        }

        if let Ok(tags) = std::env::var("GOLDEN_TAGS") {
            config.tags = tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }

    /// Config rooted at one directory, for tests that build their own corpus
    pub fn for_corpus(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            snapshot_dir: dir.clone(),
            corpus_dir: dir,
            update_snapshots: false,
            create_missing: false,
            ..Self::default()
        }
    }
}

/// Define a test that runs one fixture
#[macro_export]
macro_rules! golden_test {
    ($name:ident, $test_path:expr) => {
        #[test]
        fn $name() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let runner = GoldenTestRunner::new(GoldenConfig::from_env());

            runner
                .run_test($test_path)
                .unwrap_or_else(|e| panic!("Golden test failed: {}: {}", $test_path, e));
        }
    };
}

/// Define a test that runs every fixture matching a pattern
#[macro_export]
macro_rules! golden_test_batch {
    ($pattern:expr) => {
        #[test]
        fn golden_tests() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let runner = GoldenTestRunner::new(GoldenConfig::from_env());

            runner
                .run_batch($pattern)
                .unwrap_or_else(|e| panic!("Golden test batch failed: {}: {}", $pattern, e));
        }
    };
}
