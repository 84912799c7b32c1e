//! CSV serialization of single-source points.

use super::ScenarioReport;

const HEADER: [&str; 7] = [
    "base_name",
    "scenario",
    "impl",
    "mean_ns",
    "median_ns",
    "stddev_ns",
    "cv_pct",
];

/// One line per point, ordered by identity. Absent and undefined values are
/// empty cells.
pub fn render_points(report: &ScenarioReport) -> String {
    let mut points: Vec<_> = report.group.points().collect();
    points.sort_by(|a, b| a.identity.cmp(&b.identity));

    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for p in points {
        let cells = [
            escape(&p.identity),
            escape(&p.scenario),
            escape(&p.implementation),
            cell(Some(p.mean), 6),
            cell(p.median, 6),
            cell(p.stddev, 6),
            cell(p.cv_pct, 4),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.precision$}"),
        _ => String::new(),
    }
}

// RFC 4180 quoting.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
