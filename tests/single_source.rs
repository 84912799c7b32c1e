use std::fs;

use bench_compare::{
    compare_scenarios, extract,
    report::{csv, json, markdown, ScenarioReport, SourceInfo},
    source::load_benchmark_file,
    CompareError, ConventionDecomposer, Decompose, Decomposition, IdentityFilter,
    ImplementationOrder,
};
use indoc::indoc;
use serde_json::Value;
use tempfile::TempDir;

const VARIANTS: &str = indoc! {r#"
    {
        "context": { "date": "2026-03-04T05:06:07", "host_name": "bench-box" },
        "benchmarks": [
            { "name": "BM_IfElse_Lookup_mean", "run_name": "BM_IfElse_Lookup", "aggregate_name": "mean", "cpu_time": 75.0 },
            { "name": "BM_Patternia_Lookup_mean", "run_name": "BM_Patternia_Lookup", "aggregate_name": "mean", "cpu_time": 50.0 },
            { "name": "BM_Patternia_Lookup_cv", "run_name": "BM_Patternia_Lookup", "aggregate_name": "cv", "cpu_time": 0.015 },
            { "name": "BM_Switch_Lookup_mean", "run_name": "BM_Switch_Lookup", "aggregate_name": "mean", "cpu_time": 60.0 },
            { "name": "BM_Switch_VariantAltHot_mean", "run_name": "BM_Switch_VariantAltHot", "aggregate_name": "mean", "cpu_time": 8.0 },
            { "name": "BM_StdVisit_VariantAltHot_mean", "run_name": "BM_StdVisit_VariantAltHot", "aggregate_name": "mean", "cpu_time": 8.0 },
            { "name": "BM_Custom_VariantAltHot_mean", "run_name": "BM_Custom_VariantAltHot", "aggregate_name": "mean", "cpu_time": 12.0 }
        ]
    }
"#};

fn scenario_report(dir: &TempDir, filter: Option<&IdentityFilter>) -> Result<ScenarioReport, CompareError> {
    let path = dir.path().join("variant_all.json");
    fs::write(&path, VARIANTS).expect("write input");
    let file = load_benchmark_file(&path).expect("load");
    let set = extract(&file.benchmarks);
    let order = ImplementationOrder::default();
    let (group, ranked) = compare_scenarios(&set, filter, &ConventionDecomposer::default(), &order)?;
    Ok(ScenarioReport::assemble(
        "Variant dispatch",
        SourceInfo {
            label: "input".into(),
            path: path.display().to_string(),
            context: file.context,
        },
        group,
        ranked,
        &order,
    ))
}

#[test]
fn fastest_implementation_sets_the_baseline() {
    let dir = TempDir::new().expect("tempdir");
    let report = scenario_report(&dir, None).expect("report");

    let scenarios: Vec<_> = report.scenarios.iter().map(|s| s.ranked.scenario.as_str()).collect();
    assert_eq!(scenarios, ["Lookup", "VariantAltHot"]);

    let lookup = &report.scenarios[0].ranked;
    assert_eq!(lookup.fastest.as_deref(), Some("Patternia"));
    let order: Vec<_> = lookup.points.iter().map(|p| p.point.implementation.as_str()).collect();
    assert_eq!(order, ["Patternia", "IfElse", "Switch"]);
    assert_eq!(lookup.points[0].relative_slowdown_pct, 0.0);
    assert!((lookup.points[1].relative_slowdown_pct - 50.0).abs() < 1e-9);
    assert!((lookup.points[2].relative_slowdown_pct - 20.0).abs() < 1e-9);
}

#[test]
fn ties_resolve_by_preferred_order() {
    let dir = TempDir::new().expect("tempdir");
    let report = scenario_report(&dir, None).expect("report");
    let hot = &report.scenarios[1];
    assert_eq!(hot.label, "Variant Alt Hot");
    assert_eq!(hot.ranked.fastest.as_deref(), Some("Switch"));
    let order: Vec<_> = hot.ranked.points.iter().map(|p| p.point.implementation.as_str()).collect();
    assert_eq!(order, ["Switch", "StdVisit", "Custom"]);
    assert_eq!(report.implementations, ["Patternia", "IfElse", "Switch", "StdVisit", "Custom"]);
}

#[test]
fn filter_that_matches_nothing_yields_no_scenarios() {
    let dir = TempDir::new().expect("tempdir");
    let filter = IdentityFilter::substring("Nope");
    let err = scenario_report(&dir, Some(&filter)).unwrap_err();
    assert!(matches!(err, CompareError::NoScenarios));
    assert!(err.is_no_overlap());
}

#[test]
fn artifacts_carry_points_and_context() {
    let dir = TempDir::new().expect("tempdir");
    let report = scenario_report(&dir, None).expect("report");

    let md = markdown::render_scenarios(&report);
    assert!(md.starts_with("# Variant dispatch\n"));
    assert!(md.contains("- Host: `bench-box`"));
    assert!(md.contains("| Patternia | 50.000 | +0.00% | 1.50 |"));
    assert!(md.contains("| IfElse | 75.000 | +50.00% | - |"));

    let csv = csv::render_points(&report);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "base_name,scenario,impl,mean_ns,median_ns,stddev_ns,cv_pct");
    assert_eq!(lines.len(), 7);
    assert!(lines.contains(&"BM_Patternia_Lookup,Lookup,Patternia,50.000000,,,1.5000"));

    let doc: Value = serde_json::from_str(&json::render_scenarios(&report).expect("json")).expect("parse");
    assert_eq!(doc["kind"], "scenarios");
    assert_eq!(doc["scenarios"][0]["fastest"], "Patternia");
    assert_eq!(doc["scenarios"][0]["points"][0]["is_fastest"], true);
}

struct SuffixFirst;

impl Decompose for SuffixFirst {
    fn decompose<'a>(&self, identity: &'a str) -> Decomposition<'a> {
        match identity.rsplit_once('-') {
            Some((scenario, implementation)) => Decomposition { implementation, scenario },
            None => Decomposition { implementation: "Unknown", scenario: identity },
        }
    }
}

#[test]
fn decomposer_is_pluggable() {
    let set = extract(&[
        bench_compare::RawRecord::named("parse-fast", 1.0),
        bench_compare::RawRecord::named("parse-slow", 4.0),
    ]);
    let (group, ranked) =
        compare_scenarios(&set, None, &SuffixFirst, &ImplementationOrder::default()).expect("group");
    assert_eq!(group.len(), 1);
    assert_eq!(ranked[0].fastest.as_deref(), Some("fast"));
    assert!((ranked[0].points[1].relative_slowdown_pct - 300.0).abs() < 1e-9);
}
