use std::path::PathBuf;

use crate::aggregate::AggregateKind;

/// Error returned by the comparator and its file boundary.
///
/// Every variant is fatal for the pipeline that raised it. Undefined metrics
/// and failing gates are not errors; they travel as data.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A source file or directory could not be read or written.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A benchmark payload was not valid JSON or had the wrong shape.
    #[error("malformed benchmark json in {}: {source}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A report could not be encoded as JSON.
    #[error("failed to encode report: {0}")]
    Encode(#[source] serde_json::Error),
    /// The YAML configuration file could not be parsed.
    #[error("malformed config in {}: {source}", path.display())]
    Config {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
    /// Configuration values were rejected during validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The include pattern is not a valid regular expression.
    #[error("invalid identity filter: {0}")]
    InvalidFilter(#[from] regex::Error),
    /// A source path does not exist.
    #[error("source not found: {}", .0.display())]
    MissingSource(PathBuf),
    /// Pairwise matching produced no common identities.
    #[error("no overlapping benchmark aggregates found (check inputs / include filter)")]
    NoOverlap,
    /// Grouping produced no scenarios.
    #[error("no benchmark entries found after filtering")]
    NoScenarios,
    /// Two explicit records carried the same identity and aggregate kind.
    #[error("duplicate {kind} aggregate for benchmark {identity}")]
    DuplicateAggregate {
        /// Benchmark identity.
        identity: String,
        /// Aggregate kind that was repeated.
        kind: AggregateKind,
    },
}

impl CompareError {
    /// True when no comparison could be made at all (empty intersection or
    /// no scenarios), as opposed to unreadable or malformed input.
    pub fn is_no_overlap(&self) -> bool {
        matches!(self, CompareError::NoOverlap | CompareError::NoScenarios)
    }

    /// Process exit code for this error. Gate failures never surface as
    /// errors, so every variant maps to the input-error code.
    pub fn exit_code(&self) -> i32 {
        crate::EXIT_INPUT_ERROR
    }
}
