//! Counterfactual re-simulation and upgrade ranking.
//!
//! Each candidate perturbation is applied to a value-semantics clone of the
//! baseline configuration and pushed through the full pipeline (target
//! planning, dispatch, KPIs). Runs share nothing mutable, so the batch fans
//! out across a rayon pool; collected results stay in candidate order and
//! ranking is deterministic.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::ConfigError;
use crate::grid::GridConfig;
use crate::sim::{KpiReport, run_dispatch};

/// Penalty weights for the scalar run score (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PenaltyWeights {
    /// Weight per MWh of unserved energy.
    pub unserved: f64,
    /// Weight per MWh of fuel burned.
    pub fuel: f64,
    /// Weight per MWh of curtailed renewable output.
    pub curtailment: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            unserved: 1000.0,
            fuel: 10.0,
            curtailment: 1.0,
        }
    }
}

/// Weighted penalty score of a run.
pub fn penalty_score(kpis: &KpiReport, weights: &PenaltyWeights) -> f64 {
    kpis.total_unserved_mwh * weights.unserved
        + kpis.total_fuel_mwh * weights.fuel
        + kpis.total_curtailment_mwh * weights.curtailment
}

/// A single-scalar infrastructure modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Perturbation {
    /// Add battery energy capacity to one region; initial SoC is rescaled
    /// to keep its fraction of capacity.
    BatteryEnergy { region: String, add_mwh: f64 },
    /// Add battery power to one region.
    BatteryPower { region: String, add_mw: f64 },
    /// Add transfer capacity to one existing link.
    LinkCapacity { a: String, b: String, add_mw: f64 },
}

impl Perturbation {
    /// Human-readable label, e.g. `+8000 MWh battery storage in CA`.
    pub fn description(&self) -> String {
        match self {
            Perturbation::BatteryEnergy { region, add_mwh } => {
                format!("{add_mwh:+.0} MWh battery storage in {region}")
            }
            Perturbation::BatteryPower { region, add_mw } => {
                format!("{add_mw:+.0} MW battery power in {region}")
            }
            Perturbation::LinkCapacity { a, b, add_mw } => {
                format!("{add_mw:+.0} MW transfer capacity on {a}-{b}")
            }
        }
    }

    /// Applies the modification to a clone of the baseline configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the target region or link does not
    /// exist, or when the modified value fails validation (e.g. the change
    /// drives a capacity negative). The baseline is never touched.
    pub fn apply(&self, baseline: &GridConfig) -> Result<GridConfig, ConfigError> {
        let (horizon, mut regions, mut links) = baseline.clone().into_parts();

        match self {
            Perturbation::BatteryEnergy { region, add_mwh } => {
                let target = regions
                    .iter_mut()
                    .find(|r| &r.name == region)
                    .ok_or_else(|| ConfigError::UnknownRegion {
                        region: region.clone(),
                        context: "perturbation",
                    })?;
                let battery = &mut target.battery;
                let soc_fraction = if battery.capacity_mwh > 0.0 {
                    battery.initial_soc_mwh / battery.capacity_mwh
                } else {
                    0.0
                };
                battery.capacity_mwh += add_mwh;
                battery.initial_soc_mwh = battery.capacity_mwh * soc_fraction;
            }
            Perturbation::BatteryPower { region, add_mw } => {
                let target = regions
                    .iter_mut()
                    .find(|r| &r.name == region)
                    .ok_or_else(|| ConfigError::UnknownRegion {
                        region: region.clone(),
                        context: "perturbation",
                    })?;
                target.battery.power_mw += add_mw;
            }
            Perturbation::LinkCapacity { a, b, add_mw } => {
                let link = links
                    .iter_mut()
                    .find(|l| l.connects(a, b))
                    .ok_or_else(|| ConfigError::Link {
                        a: a.clone(),
                        b: b.clone(),
                        message: "no such link".to_string(),
                    })?;
                link.capacity_mw += add_mw;
            }
        }

        GridConfig::new(horizon, regions, links)
    }
}

/// KPI deltas of a perturbed run versus baseline (perturbed − baseline).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiDeltas {
    pub unserved_mwh: f64,
    pub fuel_mwh: f64,
    pub curtailment_mwh: f64,
    pub renewable_utilization: f64,
    /// Penalty-score delta; negative means the change is an improvement.
    pub score: f64,
}

/// Outcome of one counterfactual run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationResult {
    Scored { deltas: KpiDeltas },
    Failed { error: String },
}

/// A ranked upgrade option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based rank; most negative score delta first.
    pub rank: usize,
    pub description: String,
    pub perturbation: Perturbation,
    pub result: RecommendationResult,
}

impl Recommendation {
    /// Score delta for ranked entries, `None` for failed runs.
    pub fn score_delta(&self) -> Option<f64> {
        match &self.result {
            RecommendationResult::Scored { deltas } => Some(deltas.score),
            RecommendationResult::Failed { .. } => None,
        }
    }
}

/// Builds the standard candidate list for a configuration: +50% battery
/// energy and +50% battery power per region with storage, and +50% / +100%
/// capacity per link.
pub fn default_candidates(grid: &GridConfig) -> Vec<Perturbation> {
    let mut candidates = Vec::new();

    for region in grid.regions() {
        if region.battery.capacity_mwh > 0.0 {
            candidates.push(Perturbation::BatteryEnergy {
                region: region.name.clone(),
                add_mwh: 0.5 * region.battery.capacity_mwh,
            });
        }
    }
    for region in grid.regions() {
        if region.battery.power_mw > 0.0 {
            candidates.push(Perturbation::BatteryPower {
                region: region.name.clone(),
                add_mw: 0.5 * region.battery.power_mw,
            });
        }
    }
    for link in grid.links() {
        candidates.push(Perturbation::LinkCapacity {
            a: link.a.clone(),
            b: link.b.clone(),
            add_mw: 0.5 * link.capacity_mw,
        });
    }
    for link in grid.links() {
        candidates.push(Perturbation::LinkCapacity {
            a: link.a.clone(),
            b: link.b.clone(),
            add_mw: link.capacity_mw,
        });
    }

    candidates
}

/// Evaluates all candidates against the baseline and returns them ranked.
///
/// Each run is a pure function of (baseline, candidate) and executes on the
/// rayon pool. A candidate whose configuration fails validation becomes a
/// `Failed` entry after the ranked ones; it never aborts sibling runs.
pub fn evaluate(
    baseline: &GridConfig,
    baseline_kpis: &KpiReport,
    candidates: &[Perturbation],
    weights: &PenaltyWeights,
) -> Vec<Recommendation> {
    let baseline_score = penalty_score(baseline_kpis, weights);

    let outcomes: Vec<(usize, Perturbation, Result<KpiDeltas, ConfigError>)> = candidates
        .par_iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let outcome = candidate.apply(baseline).map(|grid| {
                let run = run_dispatch(&grid);
                let kpis = KpiReport::from_run(&run, &grid);
                KpiDeltas {
                    unserved_mwh: kpis.total_unserved_mwh - baseline_kpis.total_unserved_mwh,
                    fuel_mwh: kpis.total_fuel_mwh - baseline_kpis.total_fuel_mwh,
                    curtailment_mwh: kpis.total_curtailment_mwh
                        - baseline_kpis.total_curtailment_mwh,
                    renewable_utilization: kpis.renewable_utilization
                        - baseline_kpis.renewable_utilization,
                    score: penalty_score(&kpis, weights) - baseline_score,
                }
            });
            (idx, candidate.clone(), outcome)
        })
        .collect();

    order_recommendations(outcomes)
}

/// Sorts scored entries ascending by score delta (ties by candidate input
/// order), appends failed entries in input order, and assigns ranks.
fn order_recommendations(
    outcomes: Vec<(usize, Perturbation, Result<KpiDeltas, ConfigError>)>,
) -> Vec<Recommendation> {
    let mut scored = Vec::new();
    let mut failed = Vec::new();
    for (idx, perturbation, outcome) in outcomes {
        match outcome {
            Ok(deltas) => scored.push((idx, perturbation, deltas)),
            Err(error) => failed.push((idx, perturbation, error)),
        }
    }

    scored.sort_by(|x, y| x.2.score.total_cmp(&y.2.score).then(x.0.cmp(&y.0)));

    let mut recommendations = Vec::with_capacity(scored.len() + failed.len());
    for (_, perturbation, deltas) in scored {
        recommendations.push(Recommendation {
            rank: recommendations.len() + 1,
            description: perturbation.description(),
            perturbation,
            result: RecommendationResult::Scored { deltas },
        });
    }
    for (_, perturbation, error) in failed {
        recommendations.push(Recommendation {
            rank: recommendations.len() + 1,
            description: perturbation.description(),
            perturbation,
            result: RecommendationResult::Failed {
                error: error.to_string(),
            },
        });
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BatterySpec, FuelPlant, Region, RegionSeries, TransferLink};

    fn deltas(score: f64) -> KpiDeltas {
        KpiDeltas {
            unserved_mwh: 0.0,
            fuel_mwh: 0.0,
            curtailment_mwh: 0.0,
            renewable_utilization: 0.0,
            score,
        }
    }

    fn candidate(region: &str) -> Perturbation {
        Perturbation::BatteryPower {
            region: region.to_string(),
            add_mw: 1.0,
        }
    }

    #[test]
    fn ranking_is_ascending_by_score_delta() {
        let outcomes = vec![
            (0, candidate("A"), Ok(deltas(-2_892_400.0))),
            (1, candidate("B"), Ok(deltas(-68_310_300.0))),
            (2, candidate("C"), Ok(deltas(-35_564_800.0))),
        ];
        let ranked = order_recommendations(outcomes);
        let scores: Vec<f64> = ranked.iter().filter_map(|r| r.score_delta()).collect();
        assert_eq!(scores, vec![-68_310_300.0, -35_564_800.0, -2_892_400.0]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn ties_preserve_candidate_order() {
        let outcomes = vec![
            (0, candidate("A"), Ok(deltas(5.0))),
            (1, candidate("B"), Ok(deltas(5.0))),
            (2, candidate("C"), Ok(deltas(-1.0))),
        ];
        let ranked = order_recommendations(outcomes);
        assert_eq!(ranked[0].description, candidate("C").description());
        assert_eq!(ranked[1].description, candidate("A").description());
        assert_eq!(ranked[2].description, candidate("B").description());
    }

    #[test]
    fn failed_entries_trail_in_input_order() {
        let outcomes = vec![
            (
                0,
                candidate("A"),
                Err(ConfigError::UnknownRegion {
                    region: "A".to_string(),
                    context: "perturbation",
                }),
            ),
            (1, candidate("B"), Ok(deltas(3.0))),
        ];
        let ranked = order_recommendations(outcomes);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].score_delta().is_some());
        assert!(ranked[1].score_delta().is_none());
        assert_eq!(ranked[1].rank, 2);
    }

    fn small_grid() -> GridConfig {
        let battery = BatterySpec {
            capacity_mwh: 100.0,
            power_mw: 50.0,
            initial_soc_mwh: 60.0,
            efficiency: 1.0,
            evening_start: 0,
            evening_end: 0,
            evening_floor_fraction: 0.0,
        };
        GridConfig::new(
            2,
            vec![
                Region {
                    name: "A".to_string(),
                    series: RegionSeries::new(
                        vec![100.0, 120.0],
                        vec![60.0, 0.0],
                        vec![0.0, 0.0],
                    ),
                    battery,
                    fuel: FuelPlant::constant(40.0, 2),
                },
                Region {
                    name: "B".to_string(),
                    series: RegionSeries::new(vec![10.0, 10.0], vec![50.0, 20.0], vec![0.0, 0.0]),
                    battery: BatterySpec::none(),
                    fuel: FuelPlant::constant(30.0, 2),
                },
            ],
            vec![TransferLink::new("A", "B", 20.0)],
        )
        .expect("valid grid")
    }

    #[test]
    fn apply_rescales_initial_soc_with_capacity() {
        let grid = small_grid();
        let perturbed = Perturbation::BatteryEnergy {
            region: "A".to_string(),
            add_mwh: 50.0,
        }
        .apply(&grid)
        .expect("apply");
        let battery = &perturbed.regions()[0].battery;
        assert_eq!(battery.capacity_mwh, 150.0);
        assert!((battery.initial_soc_mwh - 90.0).abs() < 1e-9);
        // baseline untouched
        assert_eq!(grid.regions()[0].battery.capacity_mwh, 100.0);
    }

    #[test]
    fn apply_rejects_unknown_link() {
        let grid = small_grid();
        let err = Perturbation::LinkCapacity {
            a: "A".to_string(),
            b: "Z".to_string(),
            add_mw: 10.0,
        }
        .apply(&grid)
        .unwrap_err();
        assert!(matches!(err, ConfigError::Link { .. }));
    }

    #[test]
    fn negative_capacity_perturbation_fails_validation() {
        let grid = small_grid();
        let err = Perturbation::LinkCapacity {
            a: "A".to_string(),
            b: "B".to_string(),
            add_mw: -100.0,
        }
        .apply(&grid)
        .unwrap_err();
        assert!(matches!(err, ConfigError::Link { .. }));
    }

    #[test]
    fn default_candidates_cover_batteries_and_links() {
        let grid = small_grid();
        let candidates = default_candidates(&grid);
        // region A battery energy + power, link A-B at +50% and +100%
        assert_eq!(candidates.len(), 4);
        assert!(matches!(
            candidates[0],
            Perturbation::BatteryEnergy { ref region, add_mwh }
                if region.as_str() == "A" && add_mwh == 50.0
        ));
    }

    #[test]
    fn evaluate_is_deterministic_and_ordered() {
        let grid = small_grid();
        let run = run_dispatch(&grid);
        let kpis = KpiReport::from_run(&run, &grid);
        let weights = PenaltyWeights::default();
        let candidates = default_candidates(&grid);

        let first = evaluate(&grid, &kpis, &candidates, &weights);
        let second = evaluate(&grid, &kpis, &candidates, &weights);
        assert_eq!(first, second);

        let scores: Vec<f64> = first.iter().filter_map(|r| r.score_delta()).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn one_bad_candidate_does_not_abort_the_batch() {
        let grid = small_grid();
        let run = run_dispatch(&grid);
        let kpis = KpiReport::from_run(&run, &grid);
        let candidates = vec![
            Perturbation::BatteryPower {
                region: "nope".to_string(),
                add_mw: 10.0,
            },
            Perturbation::BatteryPower {
                region: "A".to_string(),
                add_mw: 10.0,
            },
        ];
        let ranked = evaluate(&grid, &kpis, &candidates, &PenaltyWeights::default());
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].score_delta().is_some());
        assert!(matches!(
            ranked[1].result,
            RecommendationResult::Failed { .. }
        ));
    }
}
