//! Hour-by-hour greedy dispatch engine.

use crate::grid::GridConfig;

use super::ledger::{DispatchRun, HourlyLedger};
use super::planner;

/// Residuals smaller than this are treated as zero when classifying a
/// region as in surplus or deficit.
const EPS_MW: f64 = 1e-9;

/// Dispatch engine for one run over one configuration.
///
/// Owns the evolving per-region battery state; hours are processed in
/// strictly increasing order since hour `h+1` depends on the state of
/// charge left by hour `h`. All tie-breaking follows the region-name
/// order fixed by [`GridConfig`].
pub struct DispatchEngine<'a> {
    grid: &'a GridConfig,
    /// Minimum-SoC target curves, `[region][hour]` (MWh).
    targets: Vec<Vec<f64>>,
    /// Current state of charge per region (MWh).
    soc: Vec<f64>,
    /// Transfer capacity between region pairs (MW), symmetric.
    capacity: Vec<Vec<f64>>,
}

impl<'a> DispatchEngine<'a> {
    /// Prepares an engine: builds SoC target curves and seeds battery state.
    pub fn new(grid: &'a GridConfig) -> Self {
        let regions = grid.regions();
        let n = regions.len();

        let targets = regions
            .iter()
            .map(|r| planner::target_curve(&r.battery, &r.series))
            .collect();
        let soc = regions.iter().map(|r| r.battery.initial_soc_mwh).collect();

        let mut capacity = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let cap = grid.capacity_between(i, j);
                capacity[i][j] = cap;
                capacity[j][i] = cap;
            }
        }

        Self {
            grid,
            targets,
            soc,
            capacity,
        }
    }

    /// SoC target curve for one region (MWh per hour).
    pub fn target_curve(&self, region_idx: usize) -> &[f64] {
        &self.targets[region_idx]
    }

    /// Executes the full horizon and returns the ordered ledger sequence.
    pub fn run(mut self) -> DispatchRun {
        let horizon = self.grid.horizon();
        let regions: Vec<String> = self
            .grid
            .regions()
            .iter()
            .map(|r| r.name.clone())
            .collect();

        let mut ledgers = Vec::with_capacity(horizon * regions.len());
        for hour in 0..horizon {
            ledgers.extend(self.step(hour));
        }

        DispatchRun {
            horizon,
            regions,
            ledgers,
        }
    }

    /// Allocates one hour across all regions, in fixed priority order:
    /// renewables, battery, direct transfers, own fuel, fuel-backed
    /// transfers, then unserved/curtailment bookkeeping.
    fn step(&mut self, hour: usize) -> Vec<HourlyLedger> {
        let regions = self.grid.regions();
        let n = regions.len();

        // Net position per region after local renewable + battery steps:
        // positive = exportable surplus, negative = unmet deficit.
        let mut net = vec![0.0; n];
        let mut charge = vec![0.0; n];
        let mut discharge = vec![0.0; n];
        let mut fuel = vec![0.0; n];
        let mut direct_in = vec![0.0; n];
        let mut direct_out = vec![0.0; n];
        let mut fuel_in = vec![0.0; n];
        let mut fuel_out = vec![0.0; n];

        // Steps 1-2: renewables to load, then battery charge/discharge.
        for (i, region) in regions.iter().enumerate() {
            let load = region.series.load[hour];
            let renewable = region.series.renewable(hour);
            let mut surplus = (renewable - load).max(0.0);
            let mut deficit = (load - renewable).max(0.0);

            if surplus > 0.0 {
                let c = surplus.min(region.battery.max_charge_mw(self.soc[i]));
                if c > 0.0 {
                    self.soc[i] = region.battery.soc_after_charge(self.soc[i], c);
                    charge[i] = c;
                    surplus -= c;
                }
            } else if deficit > 0.0 {
                let floor = self.targets[i][hour];
                let d = deficit.min(region.battery.max_discharge_mw(self.soc[i], floor));
                if d > 0.0 {
                    self.soc[i] = region.battery.soc_after_discharge(self.soc[i], d);
                    discharge[i] = d;
                    deficit -= d;
                }
            }

            net[i] = surplus - deficit;
        }

        // Absolute flow already placed on each region pair this hour; the
        // fuel-backed pass shares link capacity with the direct pass.
        let mut link_used = vec![vec![0.0; n]; n];

        // Step 3: direct transfers, deficit regions served in name order,
        // drawing from surplus regions in name order.
        for d in 0..n {
            if net[d] >= -EPS_MW {
                continue;
            }
            for s in 0..n {
                if s == d || net[s] <= EPS_MW {
                    continue;
                }
                let cap_left = self.capacity[s][d] - link_used[s][d];
                if cap_left <= EPS_MW {
                    continue;
                }
                let flow = (-net[d]).min(net[s]).min(cap_left);
                if flow > EPS_MW {
                    net[d] += flow;
                    net[s] -= flow;
                    link_used[s][d] += flow;
                    link_used[d][s] += flow;
                    direct_in[d] += flow;
                    direct_out[s] += flow;
                }
                if net[d] >= -EPS_MW {
                    break;
                }
            }
        }

        // Step 4: remaining deficit covered by the region's own fuel plant.
        for (i, region) in regions.iter().enumerate() {
            if net[i] < -EPS_MW {
                let f = (-net[i]).min(region.fuel.capacity_at(hour));
                if f > 0.0 {
                    fuel[i] = f;
                    net[i] += f;
                }
            }
        }

        // Step 5: fuel-backed transfers from regions with spare fuel
        // headroom. Extra generation offsets the export, so the exporter's
        // net position is unchanged.
        for d in 0..n {
            if net[d] >= -EPS_MW {
                continue;
            }
            for s in 0..n {
                if s == d {
                    continue;
                }
                let spare = regions[s].fuel.capacity_at(hour) - fuel[s];
                if spare <= EPS_MW {
                    continue;
                }
                let cap_left = self.capacity[s][d] - link_used[s][d];
                if cap_left <= EPS_MW {
                    continue;
                }
                let flow = (-net[d]).min(spare).min(cap_left);
                if flow > EPS_MW {
                    fuel[s] += flow;
                    net[d] += flow;
                    link_used[s][d] += flow;
                    link_used[d][s] += flow;
                    fuel_in[d] += flow;
                    fuel_out[s] += flow;
                }
                if net[d] >= -EPS_MW {
                    break;
                }
            }
        }

        // Step 6: residual deficit is unserved, residual surplus is
        // curtailed; assemble the immutable ledgers.
        let mut out = Vec::with_capacity(n);
        for (i, region) in regions.iter().enumerate() {
            let load = region.series.load[hour];
            let renewable = region.series.renewable(hour);
            let unserved = if net[i] < -EPS_MW { -net[i] } else { 0.0 };
            let curtailment = if net[i] > EPS_MW { net[i] } else { 0.0 };
            let renewable_used = renewable - curtailment;

            let ledger = HourlyLedger {
                region: region.name.clone(),
                hour,
                load_mw: load,
                renewable_mw: renewable,
                renewable_used_mw: renewable_used,
                battery_charge_mw: charge[i],
                battery_discharge_mw: discharge[i],
                soc_after_mwh: self.soc[i],
                transfer_in_mw: direct_in[i],
                transfer_out_mw: direct_out[i],
                fuel_transfer_in_mw: fuel_in[i],
                fuel_transfer_out_mw: fuel_out[i],
                fuel_mw: fuel[i],
                curtailment_mw: curtailment,
                unserved_mw: unserved,
            };

            debug_assert!(
                self.soc[i] >= -1e-6 && self.soc[i] <= region.battery.capacity_mwh + 1e-6,
                "SoC out of bounds for {} at hour {hour}: {}",
                region.name,
                self.soc[i]
            );
            debug_assert!(
                {
                    let supply = ledger.renewable_used_mw
                        + ledger.battery_discharge_mw
                        + ledger.transfer_in_total_mw()
                        + ledger.fuel_mw
                        + ledger.unserved_mw;
                    let demand =
                        ledger.load_mw + ledger.battery_charge_mw + ledger.transfer_out_total_mw();
                    (supply - demand).abs() < 1e-6
                },
                "energy balance violated for {} at hour {hour}",
                region.name
            );

            out.push(ledger);
        }
        out
    }
}

/// Runs the full pipeline for one configuration: target planning followed
/// by hour-ordered dispatch.
pub fn run_dispatch(grid: &GridConfig) -> DispatchRun {
    DispatchEngine::new(grid).run()
}
