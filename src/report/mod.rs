//! Report assembly: arranges computed rows into deterministic structures for
//! text serialization and for an external chart renderer.
//!
//! Display labels are derived here and only here. Truncation never feeds
//! back into matching, grouping or gating; every truncated label keeps a
//! legend entry pointing at its full identity.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod table;

use serde::Serialize;

use crate::{
    gate::{GateThresholds, GateVerdict},
    matcher::ScenarioGroup,
    metrics::{finite_mean, ImplementationOrder, PairwiseRow, RankedScenario},
    record::RunContext,
};

/// Default maximum display length for benchmark labels.
pub const DEFAULT_NAME_MAX_LEN: usize = 28;
/// Smallest accepted display length.
pub const MIN_NAME_MAX_LEN: usize = 10;

const ELLIPSIS: &str = "...";

/// Human-facing label for `identity`: `BM_` dropped, underscores as spaces,
/// truncated to `max_len` characters. The flag reports truncation.
pub fn display_label(identity: &str, max_len: usize) -> (String, bool) {
    let max_len = max_len.max(MIN_NAME_MAX_LEN);
    let cleaned = identity
        .strip_prefix("BM_")
        .unwrap_or(identity)
        .replace('_', " ");
    if cleaned.chars().count() <= max_len {
        return (cleaned, false);
    }
    let mut short: String = cleaned.chars().take(max_len - ELLIPSIS.len()).collect();
    short.push_str(ELLIPSIS);
    (short, true)
}

/// Axis label for a scenario: CamelCase split into words, underscores as
/// spaces.
pub fn scenario_label(scenario: &str) -> String {
    let mut out = String::with_capacity(scenario.len() + 4);
    for (i, ch) in scenario.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() && !out.ends_with(' ') {
            out.push(' ');
        }
        out.push(if ch == '_' { ' ' } else { ch });
    }
    out
}

/// Maps a truncated label back to the identity it abbreviates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Truncated label.
    pub short: String,
    /// Full identity.
    pub full: String,
}

/// One comparison source as shown in report headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceInfo {
    /// Legend label ("baseline", "current", a branch name).
    pub label: String,
    /// Where the data was read from.
    pub path: String,
    /// Pass-through run metadata.
    pub context: RunContext,
}

/// Baseline-vs-current report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseReport {
    /// Baseline source.
    pub baseline: SourceInfo,
    /// Current source.
    pub current: SourceInfo,
    /// Rows in lexical identity order.
    pub rows: Vec<PairwiseRow>,
    /// Display label per row, same order as `rows`.
    pub display_labels: Vec<String>,
    /// Truncated labels and their identities.
    pub legend: Vec<LegendEntry>,
    /// Mean of the finite deltas.
    pub average_delta_pct: Option<f64>,
    /// Mean of the finite speedups.
    pub mean_speedup: Option<f64>,
    /// Gate outcome, when a gate was evaluated.
    pub verdict: Option<GateVerdict>,
}

impl PairwiseReport {
    /// Arrange `rows` for output.
    pub fn assemble(
        baseline: SourceInfo,
        current: SourceInfo,
        mut rows: Vec<PairwiseRow>,
        name_max_len: usize,
    ) -> Self {
        rows.sort_by(|a, b| a.identity.cmp(&b.identity));
        let mut display_labels = Vec::with_capacity(rows.len());
        let mut legend = Vec::new();
        for row in &rows {
            let (short, truncated) = display_label(&row.identity, name_max_len);
            if truncated {
                legend.push(LegendEntry {
                    short: short.clone(),
                    full: row.identity.clone(),
                });
            }
            display_labels.push(short);
        }
        Self {
            baseline,
            current,
            average_delta_pct: finite_mean(rows.iter().map(|r| r.delta_pct)),
            mean_speedup: finite_mean(rows.iter().map(|r| r.speedup)),
            rows,
            display_labels,
            legend,
            verdict: None,
        }
    }

    /// Attach a gate verdict.
    pub fn with_verdict(mut self, verdict: GateVerdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Host shown in headers: current host, else baseline host.
    pub fn host(&self) -> &str {
        if self.current.context.host_name.is_empty() {
            &self.baseline.context.host_name
        } else {
            &self.current.context.host_name
        }
    }

    /// Identities whose delta is undefined, for the warnings section.
    pub fn undefined_rows(&self) -> impl Iterator<Item = &PairwiseRow> {
        self.rows.iter().filter(|r| !r.is_comparable())
    }
}

/// One scenario as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSection {
    /// Ranked points with fastest marker.
    #[serde(flatten)]
    pub ranked: RankedScenario,
    /// Axis label.
    pub label: String,
}

/// Single-source, multi-implementation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Chart title.
    pub title: String,
    /// Input source.
    pub source: SourceInfo,
    /// Implementations present in any scenario, preferred-then-lexical.
    pub implementations: Vec<String>,
    /// Scenarios in lexical order.
    pub scenarios: Vec<ScenarioSection>,
    /// The grouped points, for CSV serialization.
    #[serde(skip)]
    pub group: ScenarioGroup,
}

impl ScenarioReport {
    /// Arrange ranked scenarios for output.
    pub fn assemble(
        title: impl Into<String>,
        source: SourceInfo,
        group: ScenarioGroup,
        ranked: Vec<RankedScenario>,
        order: &ImplementationOrder,
    ) -> Self {
        let implementations = order
            .arrange(group.implementations())
            .into_iter()
            .map(str::to_string)
            .collect();
        let scenarios = ranked
            .into_iter()
            .map(|ranked| ScenarioSection {
                label: scenario_label(&ranked.scenario),
                ranked,
            })
            .collect();
        Self {
            title: title.into(),
            source,
            implementations,
            scenarios,
            group,
        }
    }
}

/// CI-facing gate summary: one `[bench-gate]` line per failed check
/// (violating rows indented below), or a single PASS line.
pub fn gate_lines(verdict: &GateVerdict, thresholds: &GateThresholds) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(limit) = thresholds.per_row_pct() {
        if !verdict.violations.is_empty() {
            lines.push(format!(
                "[bench-gate] FAIL: {} benchmark(s) exceed {} regression threshold.",
                verdict.violations.len(),
                table::fmt_signed_pct(limit),
            ));
            for row in &verdict.violations {
                lines.push(format!(
                    "  - {}: {}",
                    row.identity,
                    table::fmt_signed_pct(row.delta_pct)
                ));
            }
        }
    }
    if let Some(check) = &verdict.mean_check {
        if let (false, Some(mean)) = (check.passed, check.mean_delta_pct) {
            lines.push(format!(
                "[bench-gate] FAIL: mean delta {} exceeds {}.",
                table::fmt_signed_pct(mean),
                table::fmt_signed_pct(check.threshold_pct),
            ));
        }
    }
    if verdict.passed {
        lines.push("[bench-gate] PASS: regression thresholds satisfied.".to_string());
    }
    lines
}
