//! Derived comparison metrics.
//!
//! Undefined results are represented as NaN, never as a silent default:
//! a zero or non-finite denominator, or any non-finite input, produces NaN.
//! Formatting layers render NaN as a placeholder.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;

use crate::{
    matcher::{MatchedPair, ScenarioGroup, ScenarioPoint},
    observability::log_warn,
};

/// Signed percent change from `baseline` to `current`. Positive is slower.
pub fn delta_pct(baseline: f64, current: f64) -> f64 {
    if !baseline.is_finite() || !current.is_finite() || baseline == 0.0 {
        return f64::NAN;
    }
    (current - baseline) / baseline * 100.0
}

/// `baseline / current`; above 1.0 means current is faster.
pub fn speedup(baseline: f64, current: f64) -> f64 {
    if !baseline.is_finite() || !current.is_finite() || current == 0.0 {
        return f64::NAN;
    }
    baseline / current
}

/// Coefficient of variation as a percentage. Absent stays absent.
pub fn cv_pct(cv: Option<f64>) -> Option<f64> {
    cv.map(|fraction| fraction * 100.0)
}

/// Percent by which `mean` is slower than `fastest_mean`.
pub fn relative_slowdown_pct(mean: f64, fastest_mean: f64) -> f64 {
    if !mean.is_finite() || !fastest_mean.is_finite() || fastest_mean <= 0.0 {
        return f64::NAN;
    }
    (mean / fastest_mean - 1.0) * 100.0
}

/// Arithmetic mean of the finite values, `None` if there are none.
pub fn finite_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Pairwise comparison result for one identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseRow {
    /// Benchmark identity.
    pub identity: String,
    /// Baseline mean (ns); NaN when the baseline reported no mean.
    pub baseline_mean: f64,
    /// Current mean (ns); NaN when the current run reported no mean.
    pub current_mean: f64,
    /// See [`delta_pct`].
    pub delta_pct: f64,
    /// See [`speedup`].
    pub speedup: f64,
    /// Baseline coefficient of variation (%).
    pub baseline_cv_pct: Option<f64>,
    /// Current coefficient of variation (%).
    pub current_cv_pct: Option<f64>,
}

impl PairwiseRow {
    /// Build a row from two means, deriving delta and speedup.
    pub fn new(identity: impl Into<String>, baseline_mean: f64, current_mean: f64) -> Self {
        Self {
            identity: identity.into(),
            baseline_mean,
            current_mean,
            delta_pct: delta_pct(baseline_mean, current_mean),
            speedup: speedup(baseline_mean, current_mean),
            baseline_cv_pct: None,
            current_cv_pct: None,
        }
    }

    /// Whether this row can be assessed by the gate.
    pub fn is_comparable(&self) -> bool {
        self.delta_pct.is_finite()
    }
}

/// Derive delta, speedup and CV percentages for a matched pair.
pub fn compute_metrics(pair: &MatchedPair<'_>) -> PairwiseRow {
    let baseline_mean = pair.baseline.mean.unwrap_or(f64::NAN);
    let current_mean = pair.current.mean.unwrap_or(f64::NAN);
    let row = PairwiseRow {
        baseline_cv_pct: cv_pct(pair.baseline.cv),
        current_cv_pct: cv_pct(pair.current.cv),
        ..PairwiseRow::new(pair.identity, baseline_mean, current_mean)
    };
    if !row.is_comparable() {
        log_warn!(
            component = "metrics",
            event = "undefined_delta",
            identity = %row.identity,
            baseline_mean = row.baseline_mean,
            current_mean = row.current_mean,
        );
    }
    row
}

/// Canonical ordering of implementation labels: preferred labels first in
/// their listed order, then everything else lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationOrder {
    preferred: Vec<String>,
}

impl Default for ImplementationOrder {
    fn default() -> Self {
        Self::new(["Patternia", "IfElse", "Switch", "SwitchIndex", "StdVisit"])
    }
}

impl ImplementationOrder {
    /// Order with the given preferred labels.
    pub fn new<I, S>(preferred: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferred: preferred.into_iter().map(Into::into).collect(),
        }
    }

    /// Preferred labels as configured.
    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    fn rank(&self, label: &str) -> usize {
        self.preferred
            .iter()
            .position(|p| p == label)
            .unwrap_or(self.preferred.len())
    }

    /// Total order over labels.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b))
    }

    /// Distinct `labels` sorted by [`compare`](Self::compare).
    pub fn arrange<'a, I>(&self, labels: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<&str> = labels.into_iter().collect();
        out.sort_by(|a, b| self.compare(a, b));
        out.dedup();
        out
    }
}

/// Point with the minimum finite mean; ties go to the implementation ranked
/// first by `order`. The result does not depend on input order.
pub fn fastest<'a, I>(points: I, order: &ImplementationOrder) -> Option<&'a ScenarioPoint>
where
    I: IntoIterator<Item = &'a ScenarioPoint>,
{
    points
        .into_iter()
        .filter(|p| p.mean.is_finite())
        .min_by(|a, b| {
            a.mean
                .total_cmp(&b.mean)
                .then_with(|| order.compare(&a.implementation, &b.implementation))
        })
}

/// A scenario point with its standing against the fastest point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPoint {
    /// Underlying point.
    #[serde(flatten)]
    pub point: ScenarioPoint,
    /// See [`relative_slowdown_pct`]; exactly 0 for the fastest point.
    pub relative_slowdown_pct: f64,
    /// Whether this is the scenario's fastest point.
    pub is_fastest: bool,
}

/// One scenario with its points in implementation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScenario {
    /// Scenario label.
    pub scenario: String,
    /// Implementation of the fastest point, if any point had a finite mean.
    pub fastest: Option<String>,
    /// Points arranged by [`ImplementationOrder`].
    pub points: Vec<RankedPoint>,
}

/// Select the fastest point of one scenario and derive every point's
/// relative slowdown.
pub fn rank_scenario(
    scenario: &str,
    points: &BTreeMap<String, ScenarioPoint>,
    order: &ImplementationOrder,
) -> RankedScenario {
    let winner = fastest(points.values(), order);
    let mut ranked: Vec<RankedPoint> = points
        .values()
        .map(|point| {
            let is_fastest = winner.map_or(false, |w| w.implementation == point.implementation);
            let relative_slowdown_pct = match winner {
                Some(_) if is_fastest => 0.0,
                Some(w) => relative_slowdown_pct(point.mean, w.mean),
                None => f64::NAN,
            };
            RankedPoint {
                point: point.clone(),
                relative_slowdown_pct,
                is_fastest,
            }
        })
        .collect();
    ranked.sort_by(|a, b| order.compare(&a.point.implementation, &b.point.implementation));

    RankedScenario {
        scenario: scenario.to_string(),
        fastest: winner.map(|w| w.implementation.clone()),
        points: ranked,
    }
}

/// Rank every scenario of `group`, scenarios in lexical order.
pub fn rank_group(group: &ScenarioGroup, order: &ImplementationOrder) -> Vec<RankedScenario> {
    group
        .iter()
        .map(|(scenario, points)| rank_scenario(scenario, points, order))
        .collect()
}
