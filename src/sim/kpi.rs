//! Post-hoc KPI aggregation over a completed run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::grid::GridConfig;

use super::ledger::DispatchRun;

/// Aggregate key performance indicators for one dispatch run.
///
/// Computed post-hoc from the ledger sequence so ledger data and reported
/// metrics can never disagree. All ratio KPIs define a zero denominator as
/// a 0 ratio rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Total demand (MWh).
    pub total_load_mwh: f64,
    /// Renewable energy consumed, stored, or exported (MWh).
    pub total_renewable_used_mwh: f64,
    /// Renewable energy available (MWh).
    pub total_renewable_available_mwh: f64,
    /// Fraction of available renewable energy used (0 when none available).
    pub renewable_utilization: f64,
    /// Renewable energy wasted (MWh).
    pub total_curtailment_mwh: f64,
    /// Fossil fuel dispatched (MWh).
    pub total_fuel_mwh: f64,
    /// Demand no resource could meet (MWh).
    pub total_unserved_mwh: f64,
    /// Unserved energy per region (MWh).
    pub unserved_by_region_mwh: BTreeMap<String, f64>,
    /// Energy imported over links, direct plus fuel-backed (MWh).
    pub total_transfer_mwh: f64,
    /// Transferred energy over total link capacity across the horizon
    /// (0 when the grid has no links).
    pub transfer_utilization: f64,
    /// Total discharge over twice the fleet capacity (equivalent full
    /// cycles; 0 when the fleet has no capacity).
    pub battery_cycles: f64,
}

impl KpiReport {
    /// Aggregates KPIs from the full ledger sequence.
    pub fn from_run(run: &DispatchRun, grid: &GridConfig) -> Self {
        let mut total_load = 0.0;
        let mut renewable_used = 0.0;
        let mut renewable_available = 0.0;
        let mut curtailment = 0.0;
        let mut fuel = 0.0;
        let mut unserved = 0.0;
        let mut transferred = 0.0;
        let mut discharge = 0.0;
        let mut unserved_by_region: BTreeMap<String, f64> = run
            .regions
            .iter()
            .map(|name| (name.clone(), 0.0))
            .collect();

        for ledger in &run.ledgers {
            total_load += ledger.load_mw;
            renewable_used += ledger.renewable_used_mw;
            renewable_available += ledger.renewable_mw;
            curtailment += ledger.curtailment_mw;
            fuel += ledger.fuel_mw;
            unserved += ledger.unserved_mw;
            // count each transfer once, on the importing side
            transferred += ledger.transfer_in_total_mw();
            discharge += ledger.battery_discharge_mw;
            if ledger.unserved_mw > 0.0 {
                if let Some(entry) = unserved_by_region.get_mut(&ledger.region) {
                    *entry += ledger.unserved_mw;
                }
            }
        }

        let renewable_utilization = if renewable_available > 0.0 {
            renewable_used / renewable_available
        } else {
            0.0
        };

        let transfer_capacity_mwh = grid.total_link_capacity_mw() * run.horizon as f64;
        let transfer_utilization = if transfer_capacity_mwh > 0.0 {
            transferred / transfer_capacity_mwh
        } else {
            0.0
        };

        let fleet_capacity = grid.total_battery_capacity_mwh();
        let battery_cycles = if fleet_capacity > 0.0 {
            discharge / (2.0 * fleet_capacity)
        } else {
            0.0
        };

        Self {
            total_load_mwh: total_load,
            total_renewable_used_mwh: renewable_used,
            total_renewable_available_mwh: renewable_available,
            renewable_utilization,
            total_curtailment_mwh: curtailment,
            total_fuel_mwh: fuel,
            total_unserved_mwh: unserved,
            unserved_by_region_mwh: unserved_by_region,
            total_transfer_mwh: transferred,
            transfer_utilization,
            battery_cycles,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Total load:            {:>14.1} MWh", self.total_load_mwh)?;
        writeln!(
            f,
            "Renewable used:        {:>14.1} MWh ({:.1}% of available)",
            self.total_renewable_used_mwh,
            self.renewable_utilization * 100.0
        )?;
        writeln!(
            f,
            "Curtailment:           {:>14.1} MWh",
            self.total_curtailment_mwh
        )?;
        writeln!(f, "Fuel dispatched:       {:>14.1} MWh", self.total_fuel_mwh)?;
        writeln!(
            f,
            "Unserved energy:       {:>14.1} MWh",
            self.total_unserved_mwh
        )?;
        writeln!(
            f,
            "Transfers:             {:>14.1} MWh ({:.1}% of link capacity)",
            self.total_transfer_mwh,
            self.transfer_utilization * 100.0
        )?;
        write!(
            f,
            "Battery cycles:        {:>14.2} equivalent full cycles",
            self.battery_cycles
        )
    }
}
