//! Matching two aggregate sets by identity, and grouping one set by
//! scenario.
//!
//! Pairwise matching keeps only identities present in both sets. A
//! benchmark that was added or removed between runs has nothing to be
//! compared against, so it is dropped (and counted in a log event) rather
//! than reported as an error.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    aggregate::{AggregateMetrics, AggregateSet},
    filter::{admits, IdentityFilter},
    identity::{ConventionDecomposer, Decompose, Decomposition},
    metrics::cv_pct,
    observability::{log_debug, log_info, log_warn},
};

/// One identity present in both sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair<'a> {
    /// Shared identity.
    pub identity: &'a str,
    /// Baseline statistics.
    pub baseline: &'a AggregateMetrics,
    /// Current statistics.
    pub current: &'a AggregateMetrics,
}

/// Sorted intersection of `baseline` and `current`, after `filter`.
pub fn match_pairwise<'a>(
    baseline: &'a AggregateSet,
    current: &'a AggregateSet,
    filter: Option<&IdentityFilter>,
) -> Vec<MatchedPair<'a>> {
    let mut pairs = Vec::new();
    let mut baseline_only = 0usize;
    for (identity, base) in baseline {
        if !admits(filter, identity) {
            continue;
        }
        match current.get(identity) {
            Some(cur) => pairs.push(MatchedPair {
                identity: identity.as_str(),
                baseline: base,
                current: cur,
            }),
            None => {
                log_debug!(
                    component = "match",
                    event = "baseline_only",
                    identity = %identity,
                );
                baseline_only += 1;
            }
        }
    }
    let current_only = current
        .identities()
        .filter(|id| admits(filter, id) && !baseline.contains(id))
        .count();

    if baseline_only > 0 || current_only > 0 {
        log_info!(
            component = "match",
            event = "partial_overlap",
            matched = pairs.len(),
            baseline_only,
            current_only,
        );
    }
    pairs
}

/// One implementation measured under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPoint {
    /// Full source identity.
    pub identity: String,
    /// Scenario label.
    pub scenario: String,
    /// Implementation label.
    pub implementation: String,
    /// Mean CPU time (ns); NaN when the source reported none.
    pub mean: f64,
    /// Median CPU time (ns).
    pub median: Option<f64>,
    /// Standard deviation (ns).
    pub stddev: Option<f64>,
    /// Coefficient of variation in percent.
    pub cv_pct: Option<f64>,
}

impl ScenarioPoint {
    fn new(identity: &str, labels: Decomposition<'_>, metrics: &AggregateMetrics) -> Self {
        Self {
            identity: identity.to_string(),
            scenario: labels.scenario.to_string(),
            implementation: labels.implementation.to_string(),
            mean: metrics.mean.unwrap_or(f64::NAN),
            median: metrics.median,
            stddev: metrics.stddev,
            cv_pct: cv_pct(metrics.cv),
        }
    }
}

/// Scenario label → implementation label → point. Both levels iterate in
/// lexical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScenarioGroup {
    scenarios: BTreeMap<String, BTreeMap<String, ScenarioPoint>>,
}

impl ScenarioGroup {
    /// Add a point, replacing any earlier point for the same
    /// `(scenario, implementation)`. Returns the replaced point.
    pub fn insert(&mut self, point: ScenarioPoint) -> Option<ScenarioPoint> {
        self.scenarios
            .entry(point.scenario.clone())
            .or_default()
            .insert(point.implementation.clone(), point)
    }

    /// Points of one scenario keyed by implementation.
    pub fn get(&self, scenario: &str) -> Option<&BTreeMap<String, ScenarioPoint>> {
        self.scenarios.get(scenario)
    }

    /// Scenarios in lexical order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeMap<String, ScenarioPoint>> {
        self.scenarios.iter()
    }

    /// Scenario labels in lexical order.
    pub fn scenario_labels(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Every point, by scenario then implementation.
    pub fn points(&self) -> impl Iterator<Item = &ScenarioPoint> {
        self.scenarios.values().flat_map(BTreeMap::values)
    }

    /// Distinct implementation labels across all scenarios.
    pub fn implementations(&self) -> BTreeSet<&str> {
        self.scenarios
            .values()
            .flat_map(BTreeMap::keys)
            .map(String::as_str)
            .collect()
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// True when no scenario survived filtering.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Group `set` by scenario with the default naming conventions.
pub fn group_by_scenario(set: &AggregateSet, filter: Option<&IdentityFilter>) -> ScenarioGroup {
    group_by_scenario_with(set, filter, &ConventionDecomposer::default())
}

/// Group `set` by scenario using `decomposer`.
pub fn group_by_scenario_with<D>(
    set: &AggregateSet,
    filter: Option<&IdentityFilter>,
    decomposer: &D,
) -> ScenarioGroup
where
    D: Decompose + ?Sized,
{
    let mut group = ScenarioGroup::default();
    for (identity, metrics) in set {
        if !admits(filter, identity) {
            continue;
        }
        let labels = decomposer.decompose(identity);
        if let Some(replaced) = group.insert(ScenarioPoint::new(identity, labels, metrics)) {
            log_warn!(
                component = "match",
                event = "scenario_point_replaced",
                scenario = %labels.scenario,
                implementation = %labels.implementation,
                replaced = %replaced.identity,
                by = %identity,
            );
        }
    }
    group
}
