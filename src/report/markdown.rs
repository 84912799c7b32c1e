//! Markdown serialization of assembled reports.

use super::{
    table::{fmt_opt, fmt_signed_pct, fmt_value, TextTable},
    PairwiseReport, ScenarioReport,
};

/// Baseline-vs-current comparison document.
pub fn render_pairwise(report: &PairwiseReport) -> String {
    let base = &report.baseline;
    let cur = &report.current;

    let mut out = String::new();
    out.push_str("# Benchmark Comparison Report\n\n");
    out.push_str(&format!("- Baseline label: `{}`\n", base.label));
    out.push_str(&format!("- Current label: `{}`\n", cur.label));
    out.push_str(&format!("- Baseline file: `{}`\n", base.path));
    out.push_str(&format!("- Current file: `{}`\n\n", cur.path));

    out.push_str("## Context\n\n");
    out.push_str(&format!("- Baseline date: `{}`\n", base.context.date));
    out.push_str(&format!("- Current date: `{}`\n", cur.context.date));
    out.push_str(&format!("- Host: `{}`\n", report.host()));
    out.push_str(&format!(
        "- Build type: baseline=`{}`, current=`{}`\n\n",
        base.context.library_build_type, cur.context.library_build_type
    ));

    out.push_str("## Results\n\n");
    out.push_str(&report.to_table().to_markdown());
    out.push_str(&format!(
        "\nAverage delta: {}; mean speedup: {}x\n",
        fmt_signed_pct(report.average_delta_pct.unwrap_or(f64::NAN)),
        fmt_opt(report.mean_speedup, 2),
    ));

    let undefined: Vec<_> = report.undefined_rows().collect();
    if !undefined.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for row in undefined {
            out.push_str(&format!(
                "- `{}`: delta undefined (baseline mean {}, current mean {}); not gated\n",
                row.identity,
                fmt_value(row.baseline_mean, 3),
                fmt_value(row.current_mean, 3),
            ));
        }
    }

    if let Some(verdict) = &report.verdict {
        out.push_str("\n## Regression Gate\n\n");
        let status = if verdict.passed { "PASS" } else { "FAIL" };
        out.push_str(&format!("- Result: **{status}**\n"));
        for row in &verdict.violations {
            out.push_str(&format!(
                "- `{}`: {}\n",
                row.identity,
                fmt_signed_pct(row.delta_pct)
            ));
        }
        if let Some(check) = &verdict.mean_check {
            out.push_str(&format!(
                "- Mean delta: {} (threshold {})\n",
                fmt_signed_pct(check.mean_delta_pct.unwrap_or(f64::NAN)),
                fmt_signed_pct(check.threshold_pct),
            ));
        }
    }
    out
}

/// Per-scenario implementation comparison document.
pub fn render_scenarios(report: &ScenarioReport) -> String {
    let source = &report.source;

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", report.title));
    out.push_str(&format!("- Source: `{}`\n", source.path));
    if !source.context.date.is_empty() {
        out.push_str(&format!("- Date: `{}`\n", source.context.date));
    }
    if !source.context.host_name.is_empty() {
        out.push_str(&format!("- Host: `{}`\n", source.context.host_name));
    }
    out.push('\n');

    for section in &report.scenarios {
        out.push_str(&format!("## {}\n\n", section.ranked.scenario));
        let mut table = TextTable::new(["Impl", "Mean (ns)", "Delta vs fastest", "CV %"]);
        for ranked in &section.ranked.points {
            table.push_row(vec![
                ranked.point.implementation.clone(),
                fmt_value(ranked.point.mean, 3),
                fmt_signed_pct(ranked.relative_slowdown_pct),
                fmt_opt(ranked.point.cv_pct, 2),
            ]);
        }
        out.push_str(&table.to_markdown());
        out.push('\n');
    }
    out
}
