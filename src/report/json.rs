//! Machine-readable reports for CI consumers and chart renderers.
//!
//! Undefined metrics (NaN) serialize as `null`.

use serde::Serialize;

use super::{PairwiseReport, ScenarioReport};
use crate::error::CompareError;

/// Bumped when the JSON layout changes incompatibly.
pub const SCHEMA_VERSION: &str = "1";

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema_version: &'static str,
    kind: &'static str,
    #[serde(flatten)]
    report: &'a T,
}

/// Pretty JSON for a pairwise report, verdict included.
pub fn render_pairwise(report: &PairwiseReport) -> Result<String, CompareError> {
    render("pairwise", report)
}

/// Pretty JSON for a grouped scenario report.
pub fn render_scenarios(report: &ScenarioReport) -> Result<String, CompareError> {
    render("scenarios", report)
}

fn render<T: Serialize>(kind: &'static str, report: &T) -> Result<String, CompareError> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        report,
    };
    serde_json::to_string_pretty(&envelope).map_err(CompareError::Encode)
}
