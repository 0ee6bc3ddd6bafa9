//! Stress-hour detection over a completed run.

use std::fmt;

use serde::Serialize;

use crate::grid::GridConfig;

use super::ledger::DispatchRun;

/// Fuel utilization at or above this fraction of capacity flags a warning.
const FUEL_WARNING_FRACTION: f64 = 0.9;

/// Stress severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A flagged region-hour.
///
/// Critical: unserved energy occurred. Warning: fuel output reached 90% of
/// capacity without unserved energy. The magnitude carries the unserved MW
/// for critical events and the fuel output MW for warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressEvent {
    pub region: String,
    pub hour: usize,
    pub severity: Severity,
    pub magnitude_mw: f64,
}

impl fmt::Display for StressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} h={} ({:.1} MW)",
            self.severity, self.region, self.hour, self.magnitude_mw
        )
    }
}

/// Scans the ledger sequence once and emits stress events in ledger order.
pub fn scan(run: &DispatchRun, grid: &GridConfig) -> Vec<StressEvent> {
    let mut events = Vec::new();

    for ledger in &run.ledgers {
        if ledger.unserved_mw > 0.0 {
            events.push(StressEvent {
                region: ledger.region.clone(),
                hour: ledger.hour,
                severity: Severity::Critical,
                magnitude_mw: ledger.unserved_mw,
            });
            continue;
        }

        let region_idx = match grid.region_index(&ledger.region) {
            Some(idx) => idx,
            None => continue,
        };
        let fuel_cap = grid.regions()[region_idx].fuel.capacity_at(ledger.hour);
        if fuel_cap > 0.0 && ledger.fuel_mw >= FUEL_WARNING_FRACTION * fuel_cap {
            events.push(StressEvent {
                region: ledger.region.clone(),
                hour: ledger.hour,
                severity: Severity::Warning,
                magnitude_mw: ledger.fuel_mw,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BatterySpec, FuelPlant, Region, RegionSeries};
    use crate::sim::engine::run_dispatch;

    fn single_region(load: Vec<f64>, fuel: f64) -> GridConfig {
        let horizon = load.len();
        GridConfig::new(
            horizon,
            vec![Region {
                name: "A".to_string(),
                series: RegionSeries::new(load, vec![0.0; horizon], vec![0.0; horizon]),
                battery: BatterySpec::none(),
                fuel: FuelPlant::constant(fuel, horizon),
            }],
            vec![],
        )
        .expect("valid grid")
    }

    #[test]
    fn unserved_hour_is_critical() {
        let grid = single_region(vec![150.0], 100.0);
        let run = run_dispatch(&grid);
        let events = scan(&run, &grid);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Critical);
        assert_eq!(events[0].magnitude_mw, 50.0);
    }

    #[test]
    fn saturated_fuel_without_unserved_is_warning() {
        // 95 MW of fuel out of 100 MW capacity, fully served
        let grid = single_region(vec![95.0], 100.0);
        let run = run_dispatch(&grid);
        let events = scan(&run, &grid);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Warning);
        assert_eq!(events[0].magnitude_mw, 95.0);
    }

    #[test]
    fn critical_suppresses_warning_for_same_hour() {
        // fuel saturated AND unserved: only the critical event is emitted
        let grid = single_region(vec![150.0], 100.0);
        let run = run_dispatch(&grid);
        let events = scan(&run, &grid);
        assert!(events.iter().all(|e| e.severity == Severity::Critical));
    }

    #[test]
    fn calm_hours_emit_nothing() {
        let grid = single_region(vec![50.0, 10.0], 100.0);
        let run = run_dispatch(&grid);
        assert!(scan(&run, &grid).is_empty());
    }

    #[test]
    fn zero_fuel_capacity_never_warns() {
        let grid = single_region(vec![0.0], 0.0);
        let run = run_dispatch(&grid);
        assert!(scan(&run, &grid).is_empty());
    }
}
