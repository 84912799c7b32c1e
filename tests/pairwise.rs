use std::fs;

use bench_compare::{
    compare_pairwise, evaluate_gate, extract, extract_with,
    report::{json, markdown, PairwiseReport, SourceInfo},
    source::{load_benchmark_file, write_artifacts, Artifact},
    AggregateSet, CompareError, DuplicatePolicy, GateThresholds, IdentityFilter, RawRecord,
};
use indoc::indoc;
use serde_json::Value;
use tempfile::TempDir;

const BASELINE: &str = indoc! {r#"
    {
        "context": {
            "date": "2026-01-01T00:00:00",
            "host_name": "ci-runner",
            "library_build_type": "release"
        },
        "benchmarks": [
            { "name": "BM_Foo/min_time:1", "run_name": "BM_Foo/min_time:1", "run_type": "iteration", "cpu_time": 99.0 },
            { "name": "BM_Foo/min_time:1_mean", "run_name": "BM_Foo/min_time:1", "run_type": "aggregate", "aggregate_name": "mean", "cpu_time": 100.0 },
            { "name": "BM_Foo/min_time:1_cv", "run_name": "BM_Foo/min_time:1", "run_type": "aggregate", "aggregate_name": "cv", "cpu_time": 0.02 },
            { "name": "BM_Bar_mean", "run_name": "BM_Bar", "aggregate_name": "mean", "cpu_time": 50.0 },
            { "name": "BM_OnlyBase_mean", "run_name": "BM_OnlyBase", "aggregate_name": "mean", "cpu_time": 10.0 }
        ]
    }
"#};

const CURRENT: &str = indoc! {r#"
    {
        "context": { "date": "2026-01-02T00:00:00", "host_name": "ci-runner" },
        "benchmarks": [
            { "name": "BM_Foo/min_time:1_mean", "run_name": "BM_Foo/min_time:1", "aggregate_name": "mean", "cpu_time": 120.0 },
            { "name": "BM_Bar_mean", "run_name": "BM_Bar", "aggregate_name": "mean", "cpu_time": 45.0 },
            { "name": "BM_OnlyCurrent_mean", "run_name": "BM_OnlyCurrent", "aggregate_name": "mean", "cpu_time": 7.0 }
        ]
    }
"#};

fn load_pair(dir: &TempDir) -> (AggregateSet, AggregateSet) {
    let base_path = dir.path().join("baseline.json");
    let cur_path = dir.path().join("current.json");
    fs::write(&base_path, BASELINE).expect("write baseline");
    fs::write(&cur_path, CURRENT).expect("write current");
    let base = load_benchmark_file(&base_path).expect("load baseline");
    let cur = load_benchmark_file(&cur_path).expect("load current");
    (extract(&base.benchmarks), extract(&cur.benchmarks))
}

#[test]
fn regression_row_matches_reference_numbers() {
    let dir = TempDir::new().expect("tempdir");
    let (baseline, current) = load_pair(&dir);
    assert_eq!(baseline.len(), 3);

    let rows = compare_pairwise(&baseline, &current, None).expect("rows");
    let identities: Vec<_> = rows.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(identities, ["BM_Bar", "BM_Foo/min_time:1"]);

    let foo = &rows[1];
    assert!((foo.delta_pct - 20.0).abs() < 1e-9);
    assert!((foo.speedup - 0.833_333).abs() < 1e-6);
    assert!((foo.baseline_cv_pct.expect("cv") - 2.0).abs() < 1e-9);
    assert_eq!(foo.current_cv_pct, None);

    let bar = &rows[0];
    assert!((bar.delta_pct + 10.0).abs() < 1e-9);
}

#[test]
fn include_filter_narrows_the_intersection() {
    let dir = TempDir::new().expect("tempdir");
    let (baseline, current) = load_pair(&dir);

    let filter = IdentityFilter::from_pattern(Some("^BM_Foo"), false)
        .expect("valid regex")
        .expect("non-empty pattern");
    let rows = compare_pairwise(&baseline, &current, Some(&filter)).expect("rows");
    assert_eq!(rows.len(), 1);

    let nothing = IdentityFilter::substring("Missing");
    let err = compare_pairwise(&baseline, &current, Some(&nothing)).unwrap_err();
    assert!(err.is_no_overlap());
    assert_eq!(err.exit_code(), bench_compare::EXIT_INPUT_ERROR);
}

#[test]
fn gate_flags_only_rows_over_threshold() {
    let dir = TempDir::new().expect("tempdir");
    let (baseline, current) = load_pair(&dir);
    let rows = compare_pairwise(&baseline, &current, None).expect("rows");

    let strict = GateThresholds::new(Some(10.0), None).expect("thresholds");
    let verdict = evaluate_gate(&rows, &strict);
    assert!(!verdict.passed);
    assert_eq!(verdict.violations.len(), 1);
    assert_eq!(verdict.violations[0].identity, "BM_Foo/min_time:1");

    let lenient = GateThresholds::new(Some(25.0), Some(10.0)).expect("thresholds");
    assert!(evaluate_gate(&rows, &lenient).passed);
}

#[test]
fn zero_baseline_is_undefined_and_never_gated() {
    let baseline = extract(&[RawRecord::aggregate("BM_Zero", "mean", 0.0)]);
    let current = extract(&[RawRecord::aggregate("BM_Zero", "mean", 3.0)]);
    let rows = compare_pairwise(&baseline, &current, None).expect("rows");
    assert!(rows[0].delta_pct.is_nan());
    assert_eq!(rows[0].speedup, 0.0);

    let verdict = evaluate_gate(&rows, &GateThresholds::new(Some(0.0), Some(0.0)).expect("thresholds"));
    assert!(verdict.passed);
    assert_eq!(verdict.unassessed, ["BM_Zero"]);
}

#[test]
fn disjoint_sources_do_not_overlap() {
    let baseline = extract(&[RawRecord::aggregate("BM_A", "mean", 1.0)]);
    let current = extract(&[RawRecord::aggregate("BM_B", "mean", 1.0)]);
    assert!(matches!(
        compare_pairwise(&baseline, &current, None),
        Err(CompareError::NoOverlap)
    ));
}

#[test]
fn strict_duplicates_reject_repeated_aggregates() {
    let records = [
        RawRecord::aggregate("BM_A", "mean", 1.0),
        RawRecord::aggregate("BM_A", "mean", 2.0),
    ];
    let lenient = extract_with(&records, DuplicatePolicy::LastWriteWins).expect("set");
    assert_eq!(lenient.get("BM_A").and_then(|m| m.mean), Some(2.0));

    let err = extract_with(&records, DuplicatePolicy::Reject).unwrap_err();
    assert!(matches!(err, CompareError::DuplicateAggregate { ref identity, .. } if identity == "BM_A"));
}

#[test]
fn rendered_reports_land_in_outdir() {
    let dir = TempDir::new().expect("tempdir");
    let (baseline, current) = load_pair(&dir);
    let rows = compare_pairwise(&baseline, &current, None).expect("rows");
    let thresholds = GateThresholds::new(Some(10.0), None).expect("thresholds");
    let verdict = evaluate_gate(&rows, &thresholds);
    let base_file = load_benchmark_file(&dir.path().join("baseline.json")).expect("load");

    let report = PairwiseReport::assemble(
        SourceInfo {
            label: "main".into(),
            path: "baseline.json".into(),
            context: base_file.context,
        },
        SourceInfo {
            label: "feature".into(),
            path: "current.json".into(),
            ..SourceInfo::default()
        },
        rows,
        28,
    )
    .with_verdict(verdict);

    let outdir = dir.path().join("out");
    let artifacts = [
        Artifact::new("bench_compare", "md", markdown::render_pairwise(&report)),
        Artifact::new("bench_compare", "json", json::render_pairwise(&report).expect("json")),
    ];
    write_artifacts(&outdir, &artifacts).expect("write");

    let md = fs::read_to_string(outdir.join("bench_compare.md")).expect("md");
    assert!(md.contains("- Baseline label: `main`"));
    assert!(md.contains("- Host: `ci-runner`"));
    assert!(md.contains("| BM_Foo/min_time:1 | 100.000 | 120.000 | +20.00% | 0.833 | 2.00 | - |"));
    assert!(md.contains("- Result: **FAIL**"));

    let doc: Value =
        serde_json::from_str(&fs::read_to_string(outdir.join("bench_compare.json")).expect("json"))
            .expect("parse");
    assert_eq!(doc["rows"].as_array().map(Vec::len), Some(2));
    assert_eq!(doc["baseline"]["context"]["library_build_type"], "release");
    assert_eq!(doc["verdict"]["passed"], false);
}
