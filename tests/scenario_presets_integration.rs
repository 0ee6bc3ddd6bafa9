//! Integration tests for the built-in scenario presets.

use grid_dispatch::config::ScenarioConfig;
use grid_dispatch::sim::{KpiReport, Severity, run_dispatch, stress};
use grid_dispatch::whatif::{self, PenaltyWeights};

#[test]
fn all_presets_run_end_to_end() {
    for name in ScenarioConfig::PRESETS {
        let grid = ScenarioConfig::from_preset(name)
            .expect("preset loads")
            .build()
            .expect("preset builds");
        let run = run_dispatch(&grid);
        let kpis = KpiReport::from_run(&run, &grid);

        assert!(kpis.total_load_mwh > 0.0, "preset \"{name}\"");
        assert!(kpis.total_load_mwh.is_finite());
        assert!(kpis.renewable_utilization.is_finite());
        assert!((0.0..=1.0).contains(&kpis.renewable_utilization));
        assert!(kpis.battery_cycles.is_finite());
        assert!(kpis.transfer_utilization >= 0.0);
    }
}

#[test]
fn evening_crunch_produces_critical_stress() {
    // The preset's fuel fleet is deliberately undersized for the evening
    // peak; the run must flag unserved hours.
    let grid = ScenarioConfig::evening_crunch().build().expect("builds");
    let run = run_dispatch(&grid);
    let kpis = KpiReport::from_run(&run, &grid);
    assert!(kpis.total_unserved_mwh > 0.0);

    let events = stress::scan(&run, &grid);
    assert!(events.iter().any(|e| e.severity == Severity::Critical));
}

#[test]
fn preset_recommendation_batch_is_deterministic() {
    let grid = ScenarioConfig::evening_crunch().build().expect("builds");
    let run = run_dispatch(&grid);
    let kpis = KpiReport::from_run(&run, &grid);
    let candidates = whatif::default_candidates(&grid);
    assert!(!candidates.is_empty());

    let first = whatif::evaluate(&grid, &kpis, &candidates, &PenaltyWeights::default());
    let second = whatif::evaluate(&grid, &kpis, &candidates, &PenaltyWeights::default());
    assert_eq!(first, second);

    let scores: Vec<f64> = first.iter().filter_map(|r| r.score_delta()).collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn stress_events_follow_ledger_order() {
    let grid = ScenarioConfig::evening_crunch().build().expect("builds");
    let run = run_dispatch(&grid);
    let events = stress::scan(&run, &grid);
    for pair in events.windows(2) {
        assert!(pair[0].hour <= pair[1].hour);
    }
}
