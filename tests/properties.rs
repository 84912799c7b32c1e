use std::collections::{BTreeMap, BTreeSet};

use bench_compare::{
    evaluate_gate, match_pairwise,
    metrics::{delta_pct, fastest, speedup},
    AggregateMetrics, AggregateSet, GateThresholds, ImplementationOrder, PairwiseRow,
    ScenarioPoint,
};
use itertools::Itertools;
use proptest::prelude::*;

fn aggregate_set() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::btree_map("BM_[A-F][a-c]", 1.0f64..1e6, 0..12)
}

fn to_set(entries: &BTreeMap<String, f64>) -> AggregateSet {
    entries
        .iter()
        .map(|(id, mean)| (id.clone(), AggregateMetrics::with_mean(*mean)))
        .collect()
}

fn point(implementation: &str, mean: f64) -> ScenarioPoint {
    ScenarioPoint {
        identity: format!("BM_{implementation}_Case"),
        scenario: "Case".to_string(),
        implementation: implementation.to_string(),
        mean,
        median: None,
        stddev: None,
        cv_pct: None,
    }
}

proptest! {
    #[test]
    fn matching_yields_the_sorted_intersection(base in aggregate_set(), cur in aggregate_set()) {
        let baseline = to_set(&base);
        let current = to_set(&cur);
        let matched: Vec<&str> = match_pairwise(&baseline, &current, None)
            .iter()
            .map(|pair| pair.identity)
            .collect();

        let expected: Vec<&str> = base
            .keys()
            .filter(|id| cur.contains_key(*id))
            .map(String::as_str)
            .collect();
        prop_assert_eq!(matched, expected);
    }

    #[test]
    fn delta_sign_follows_the_means(b in 1e-3f64..1e9, c in 1e-3f64..1e9) {
        let delta = delta_pct(b, c);
        prop_assert!(delta.is_finite());
        if c > b {
            prop_assert!(delta > 0.0);
        } else if c < b {
            prop_assert!(delta < 0.0);
        } else {
            prop_assert_eq!(delta, 0.0);
        }
    }

    #[test]
    fn speedup_is_consistent_with_delta(b in 1e-3f64..1e6, ratio in 1e-3f64..1e3) {
        let c = b * ratio;
        let s = speedup(b, c);
        let d = delta_pct(b, c);
        prop_assert!(((1.0 + d / 100.0) * s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fastest_ignores_input_order(means in prop::collection::vec(1u32..5, 2..5)) {
        let labels = ["Patternia", "IfElse", "Switch", "SwitchIndex", "StdVisit"];
        let order = ImplementationOrder::default();
        let points: Vec<ScenarioPoint> = labels
            .iter()
            .zip(&means)
            .map(|(label, mean)| point(label, f64::from(*mean)))
            .collect();

        let winners: BTreeSet<String> = points
            .iter()
            .permutations(points.len())
            .filter_map(|perm| fastest(perm, &order).map(|p| p.implementation.clone()))
            .collect();
        prop_assert_eq!(winners.len(), 1);
    }

    #[test]
    fn gate_is_idempotent(
        deltas in prop::collection::vec(-50.0f64..50.0, 0..10),
        limit in 0.0f64..20.0,
    ) {
        let rows: Vec<PairwiseRow> = deltas
            .iter()
            .enumerate()
            .map(|(i, d)| PairwiseRow::new(format!("BM_{i}"), 100.0, 100.0 + d))
            .collect();
        let thresholds = GateThresholds::new(Some(limit), Some(limit)).unwrap();
        let first = evaluate_gate(&rows, &thresholds);
        let second = evaluate_gate(&rows, &thresholds);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.violations.iter().all(|row| row.delta_pct > limit));
    }
}
