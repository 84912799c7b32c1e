//! Pass/fail regression gate over pairwise rows.
//!
//! Thresholds are percentages in the same unit as
//! [`PairwiseRow::delta_pct`]: a higher delta is slower, so a check fails
//! when a delta is strictly greater than its threshold. Rows whose delta is
//! undefined cannot be assessed and never count as violations.

use serde::Serialize;

use crate::{
    error::CompareError,
    metrics::{finite_mean, PairwiseRow},
    observability::log_info,
};

/// Enabled checks and their limits. `None` disables a check. Only built
/// through [`GateThresholds::new`], so every enabled limit is finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GateThresholds {
    per_row_pct: Option<f64>,
    mean_pct: Option<f64>,
}

impl GateThresholds {
    /// Thresholds after checking that every enabled limit is finite.
    pub fn new(per_row_pct: Option<f64>, mean_pct: Option<f64>) -> Result<Self, CompareError> {
        for (name, value) in [("per-row", per_row_pct), ("mean", mean_pct)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CompareError::InvalidConfig(format!(
                        "{name} regression threshold must be finite, got {v}"
                    )));
                }
            }
        }
        Ok(Self {
            per_row_pct,
            mean_pct,
        })
    }

    /// Limit applied to every row's delta.
    pub fn per_row_pct(&self) -> Option<f64> {
        self.per_row_pct
    }

    /// Limit applied to the mean of all finite deltas.
    pub fn mean_pct(&self) -> Option<f64> {
        self.mean_pct
    }

    /// True when at least one check is enabled.
    pub fn is_enabled(&self) -> bool {
        self.per_row_pct.is_some() || self.mean_pct.is_some()
    }
}

/// Outcome of the mean check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanCheck {
    /// Mean of the finite deltas; `None` when no row was comparable.
    pub mean_delta_pct: Option<f64>,
    /// Configured limit.
    pub threshold_pct: f64,
    /// Whether the check passed.
    pub passed: bool,
}

/// Gate outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateVerdict {
    /// Conjunction of all enabled checks.
    pub passed: bool,
    /// Rows exceeding the per-row threshold, in input order.
    pub violations: Vec<PairwiseRow>,
    /// Mean check outcome, when enabled.
    pub mean_check: Option<MeanCheck>,
    /// Identities whose delta could not be assessed.
    pub unassessed: Vec<String>,
}

/// Evaluate `rows` against `thresholds`. Pure: identical inputs give
/// identical verdicts.
pub fn evaluate_gate(rows: &[PairwiseRow], thresholds: &GateThresholds) -> GateVerdict {
    let violations: Vec<PairwiseRow> = match thresholds.per_row_pct {
        Some(limit) => rows
            .iter()
            .filter(|row| row.delta_pct.is_finite() && row.delta_pct > limit)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mean_check = thresholds.mean_pct.map(|limit| {
        let mean_delta_pct = finite_mean(rows.iter().map(|row| row.delta_pct));
        MeanCheck {
            mean_delta_pct,
            threshold_pct: limit,
            passed: mean_delta_pct.map_or(true, |mean| mean <= limit),
        }
    });

    let unassessed = rows
        .iter()
        .filter(|row| !row.is_comparable())
        .map(|row| row.identity.clone())
        .collect();

    let passed = violations.is_empty() && mean_check.map_or(true, |check| check.passed);
    log_info!(
        component = "gate",
        event = "gate_evaluated",
        passed,
        rows = rows.len(),
        violations = violations.len(),
    );

    GateVerdict {
        passed,
        violations,
        mean_check,
        unassessed,
    }
}
