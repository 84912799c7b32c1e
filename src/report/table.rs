//! Row-oriented tables and value formatting.
//!
//! Undefined values (NaN, ±inf) and absent values render as
//! [`PLACEHOLDER`], never as a number-looking string.

use comfy_table::{presets::UTF8_FULL, CellAlignment, Table};

use super::{PairwiseReport, ScenarioReport};

/// Rendered in place of an undefined or absent value.
pub const PLACEHOLDER: &str = "-";

/// `value` with `precision` decimals, or the placeholder.
pub fn fmt_value(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{value:.precision$}")
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Like [`fmt_value`] for optional statistics.
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| fmt_value(v, precision))
}

/// Signed percentage, e.g. `+20.00%`, or the placeholder.
pub fn fmt_signed_pct(value: f64) -> String {
    if value.is_finite() {
        format!("{value:+.2}%")
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Header plus string cells. The first column is a label; the rest are
/// numeric and right-aligned when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows, each as wide as `headers`.
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// GitHub-flavored markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&markdown_line(&self.headers));
        let align: Vec<String> = (0..self.headers.len())
            .map(|i| if i == 0 { "---" } else { "---:" }.to_string())
            .collect();
        out.push_str(&markdown_line(&align));
        for row in &self.rows {
            out.push_str(&markdown_line(row));
        }
        out
    }

    /// Box-drawn table for terminals.
    pub fn to_terminal(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(&self.headers);
        for row in &self.rows {
            table.add_row(row);
        }
        for (i, column) in table.column_iter_mut().enumerate() {
            if i > 0 {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table.to_string()
    }
}

fn markdown_line(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |\n", escaped.join(" | "))
}

impl PairwiseReport {
    /// One row per benchmark.
    pub fn to_table(&self) -> TextTable {
        let mut table = TextTable::new([
            "Benchmark",
            "Baseline mean (ns)",
            "Current mean (ns)",
            "Delta %",
            "Speedup (x)",
            "Baseline CV %",
            "Current CV %",
        ]);
        for row in &self.rows {
            table.push_row(vec![
                row.identity.clone(),
                fmt_value(row.baseline_mean, 3),
                fmt_value(row.current_mean, 3),
                fmt_signed_pct(row.delta_pct),
                fmt_value(row.speedup, 3),
                fmt_opt(row.baseline_cv_pct, 2),
                fmt_opt(row.current_cv_pct, 2),
            ]);
        }
        table
    }
}

impl ScenarioReport {
    /// One row per (scenario, implementation) in implementation order, the
    /// fastest marked `*`.
    pub fn to_table(&self) -> TextTable {
        let mut table = TextTable::new([
            "Scenario",
            "Impl",
            "Mean (ns)",
            "Delta vs fastest",
            "CV %",
        ]);
        for section in &self.scenarios {
            for ranked in &section.ranked.points {
                let implementation = if ranked.is_fastest {
                    format!("{} *", ranked.point.implementation)
                } else {
                    ranked.point.implementation.clone()
                };
                table.push_row(vec![
                    section.ranked.scenario.clone(),
                    implementation,
                    fmt_value(ranked.point.mean, 3),
                    fmt_signed_pct(ranked.relative_slowdown_pct),
                    fmt_opt(ranked.point.cv_pct, 2),
                ]);
            }
        }
        table
    }
}
