//! Immutable per-region-hour allocation records.

use std::fmt;

/// Complete allocation record for one region and one hour.
///
/// Created once by the dispatch engine and never mutated. All power values
/// are MW averaged over the hour (numerically equal to MWh).
///
/// Balance invariants, checked in testing builds:
/// `renewable_mw == renewable_used_mw + curtailment_mw`, and
/// `load + battery_charge + transfer_out_total ==
///  renewable_used + battery_discharge + transfer_in_total + fuel + unserved`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyLedger {
    /// Region name.
    pub region: String,
    /// Hour index within the horizon.
    pub hour: usize,
    /// Demand (MW).
    pub load_mw: f64,
    /// Renewable generation available (MW).
    pub renewable_mw: f64,
    /// Renewable consumed, stored, or exported (MW).
    pub renewable_used_mw: f64,
    /// Battery charge drawn from the bus (MW).
    pub battery_charge_mw: f64,
    /// Battery discharge delivered to the bus (MW).
    pub battery_discharge_mw: f64,
    /// State of charge at the end of this hour (MWh).
    pub soc_after_mwh: f64,
    /// Direct (renewable-surplus) imports (MW).
    pub transfer_in_mw: f64,
    /// Direct exports (MW).
    pub transfer_out_mw: f64,
    /// Fuel-backed imports (MW).
    pub fuel_transfer_in_mw: f64,
    /// Fuel-backed exports (MW).
    pub fuel_transfer_out_mw: f64,
    /// Total fuel dispatched, including exported backing (MW).
    pub fuel_mw: f64,
    /// Renewable generation wasted (MW).
    pub curtailment_mw: f64,
    /// Demand no resource could meet (MW).
    pub unserved_mw: f64,
}

impl HourlyLedger {
    /// Total imports, direct plus fuel-backed (MW).
    pub fn transfer_in_total_mw(&self) -> f64 {
        self.transfer_in_mw + self.fuel_transfer_in_mw
    }

    /// Total exports, direct plus fuel-backed (MW).
    pub fn transfer_out_total_mw(&self) -> f64 {
        self.transfer_out_mw + self.fuel_transfer_out_mw
    }
}

impl fmt::Display for HourlyLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>3} {:<4} | load={:>8.1}  ren={:>8.1} (used {:>8.1}, curt {:>7.1}) | \
             bat +{:>6.1}/-{:>6.1} (SoC {:>8.1}) | xfer in={:>7.1} out={:>7.1} | \
             fuel={:>7.1} | unserved={:>7.1}",
            self.hour,
            self.region,
            self.load_mw,
            self.renewable_mw,
            self.renewable_used_mw,
            self.curtailment_mw,
            self.battery_charge_mw,
            self.battery_discharge_mw,
            self.soc_after_mwh,
            self.transfer_in_total_mw(),
            self.transfer_out_total_mw(),
            self.fuel_mw,
            self.unserved_mw,
        )
    }
}

/// The ordered ledger sequence of a completed run.
///
/// Ledgers are hour-major: all regions for hour 0 (in region-name order),
/// then hour 1, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRun {
    /// Horizon length H.
    pub horizon: usize,
    /// Region names in ledger order.
    pub regions: Vec<String>,
    /// `horizon * regions.len()` ledgers, hour-major.
    pub ledgers: Vec<HourlyLedger>,
}

impl DispatchRun {
    /// Ledger for one region-hour.
    pub fn ledger(&self, hour: usize, region_idx: usize) -> &HourlyLedger {
        &self.ledgers[hour * self.regions.len() + region_idx]
    }

    /// All ledgers of one region, in hour order.
    pub fn region_ledgers(&self, region_idx: usize) -> impl Iterator<Item = &HourlyLedger> {
        self.ledgers
            .iter()
            .skip(region_idx)
            .step_by(self.regions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(region: &str, hour: usize) -> HourlyLedger {
        HourlyLedger {
            region: region.to_string(),
            hour,
            load_mw: 100.0,
            renewable_mw: 40.0,
            renewable_used_mw: 40.0,
            battery_charge_mw: 0.0,
            battery_discharge_mw: 10.0,
            soc_after_mwh: 50.0,
            transfer_in_mw: 5.0,
            transfer_out_mw: 0.0,
            fuel_transfer_in_mw: 2.0,
            fuel_transfer_out_mw: 0.0,
            fuel_mw: 43.0,
            curtailment_mw: 0.0,
            unserved_mw: 0.0,
        }
    }

    #[test]
    fn indexing_is_hour_major() {
        let run = DispatchRun {
            horizon: 2,
            regions: vec!["CA".to_string(), "TX".to_string()],
            ledgers: vec![
                ledger("CA", 0),
                ledger("TX", 0),
                ledger("CA", 1),
                ledger("TX", 1),
            ],
        };
        assert_eq!(run.ledger(1, 0).region, "CA");
        assert_eq!(run.ledger(1, 0).hour, 1);
        assert_eq!(run.ledger(0, 1).region, "TX");

        let tx_hours: Vec<usize> = run.region_ledgers(1).map(|l| l.hour).collect();
        assert_eq!(tx_hours, vec![0, 1]);
    }

    #[test]
    fn transfer_totals_combine_both_kinds() {
        let l = ledger("CA", 0);
        assert_eq!(l.transfer_in_total_mw(), 7.0);
        assert_eq!(l.transfer_out_total_mw(), 0.0);
    }

    #[test]
    fn display_does_not_panic() {
        assert!(!format!("{}", ledger("CA", 0)).is_empty());
    }
}
