#![deny(missing_docs)]
//! Comparator for Google Benchmark aggregate results.
//!
//! Two pipelines share the same building blocks:
//!
//! - **pairwise**: baseline vs current. Records are extracted into
//!   [`AggregateSet`]s, intersected by identity, turned into
//!   [`PairwiseRow`]s with delta and speedup, and optionally gated.
//! - **grouped**: one source holding several competing implementations.
//!   Identities are decomposed into `(implementation, scenario)`, grouped by
//!   scenario, and ranked against the fastest implementation.
//!
//! Every stage is a pure function of its inputs. File access lives in
//! [`source`] and is only used at the edges.

/// Aggregate extraction from raw records.
pub mod aggregate;
/// YAML configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Identity filter predicate.
pub mod filter;
/// Pass/fail regression gate.
pub mod gate;
/// Identity decomposition into implementation and scenario.
pub mod identity;
/// Pairwise matching and scenario grouping.
pub mod matcher;
/// Derived comparison metrics.
pub mod metrics;
mod observability;
/// Input record format.
pub mod record;
/// Report assembly and text serialization.
pub mod report;
/// File loading, staging and artifact writing.
pub mod source;

pub use crate::{
    aggregate::{extract, extract_with, AggregateKind, AggregateMetrics, AggregateSet, DuplicatePolicy},
    error::CompareError,
    filter::IdentityFilter,
    gate::{evaluate_gate, GateThresholds, GateVerdict},
    identity::{decompose, ConventionDecomposer, Decompose, Decomposition},
    matcher::{group_by_scenario, match_pairwise, MatchedPair, ScenarioGroup, ScenarioPoint},
    metrics::{compute_metrics, ImplementationOrder, PairwiseRow, RankedPoint, RankedScenario},
    record::{BenchmarkFile, RawRecord, RunContext},
};

/// Normal completion.
pub const EXIT_OK: i32 = 0;
/// A regression gate check failed.
pub const EXIT_GATE_FAILED: i32 = 1;
/// Input was missing or malformed, or there was nothing to compare.
pub const EXIT_INPUT_ERROR: i32 = 2;

/// Match two sets and compute a row per common identity.
///
/// Fails with [`CompareError::NoOverlap`] when nothing survives the filter
/// and intersection.
pub fn compare_pairwise(
    baseline: &AggregateSet,
    current: &AggregateSet,
    filter: Option<&IdentityFilter>,
) -> Result<Vec<PairwiseRow>, CompareError> {
    let rows: Vec<PairwiseRow> = match_pairwise(baseline, current, filter)
        .iter()
        .map(compute_metrics)
        .collect();
    if rows.is_empty() {
        return Err(CompareError::NoOverlap);
    }
    Ok(rows)
}

/// Group one set by scenario and rank each scenario.
///
/// Fails with [`CompareError::NoScenarios`] when nothing survives the filter.
pub fn compare_scenarios<D>(
    set: &AggregateSet,
    filter: Option<&IdentityFilter>,
    decomposer: &D,
    order: &ImplementationOrder,
) -> Result<(ScenarioGroup, Vec<RankedScenario>), CompareError>
where
    D: Decompose + ?Sized,
{
    let group = matcher::group_by_scenario_with(set, filter, decomposer);
    if group.is_empty() {
        return Err(CompareError::NoScenarios);
    }
    let ranked = metrics::rank_group(&group, order);
    Ok((group, ranked))
}
