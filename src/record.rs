//! Input record format produced by Google Benchmark's JSON reporter.
//!
//! Only the fields the comparator reads are modeled; everything else in a
//! payload is ignored by serde.

use serde::{Deserialize, Serialize};

/// One benchmark result document: an optional `context` block followed by
/// the flat `benchmarks` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkFile {
    /// Descriptive run metadata, passed through to report headers.
    #[serde(default)]
    pub context: RunContext,
    /// Raw benchmark observations, aggregates and iterations interleaved.
    #[serde(default)]
    pub benchmarks: Vec<RawRecord>,
}

/// Opaque run metadata. The comparator performs no logic on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunContext {
    /// Run timestamp as written by the reporter.
    #[serde(default)]
    pub date: String,
    /// Host label.
    #[serde(default)]
    pub host_name: String,
    /// Benchmark executable path.
    #[serde(default)]
    pub executable: String,
    /// Build type of the benchmark library ("release", "debug").
    #[serde(default)]
    pub library_build_type: String,
}

/// One reported benchmark observation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    /// Identity shared by all repetitions and aggregates of one case.
    #[serde(default)]
    pub run_name: Option<String>,
    /// Full entry name; for aggregates this carries a `_<kind>` suffix.
    #[serde(default)]
    pub name: Option<String>,
    /// Aggregate tag such as "mean" or "cv"; absent for iteration entries.
    #[serde(default)]
    pub aggregate_name: Option<String>,
    /// CPU time in nanoseconds (or a fraction for `cv`).
    #[serde(default)]
    pub cpu_time: Option<f64>,
}

impl RawRecord {
    /// Aggregate record keyed by `run_name`, the shape Google Benchmark emits
    /// with `--benchmark_repetitions`.
    pub fn aggregate(run_name: &str, kind: &str, cpu_time: f64) -> Self {
        Self {
            run_name: Some(run_name.to_string()),
            name: Some(format!("{run_name}_{kind}")),
            aggregate_name: Some(kind.to_string()),
            cpu_time: Some(cpu_time),
        }
    }

    /// Record that only carries `name`, as produced by older reporters.
    pub fn named(name: &str, cpu_time: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            cpu_time: Some(cpu_time),
            ..Self::default()
        }
    }

    pub(crate) fn run_name(&self) -> Option<&str> {
        self.run_name.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn aggregate_name(&self) -> Option<&str> {
        self.aggregate_name.as_deref().filter(|s| !s.is_empty())
    }
}
