//! Stationary battery storage spec and bounded flow arithmetic.

use crate::error::ConfigError;

/// Battery specification for one region.
///
/// The battery itself is stateless; the dispatch engine owns the evolving
/// state of charge and calls back into this spec for the bounded flow limits,
/// so clones of a configuration can never alias live state.
///
/// Power values are bus-side MW. `efficiency` is round-trip; each direction
/// loses `sqrt(efficiency)`, applied to the SoC delta only.
///
/// A capacity of 0 models a region without storage: limits and targets all
/// collapse to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySpec {
    /// Usable energy capacity (MWh).
    pub capacity_mwh: f64,
    /// Charge/discharge power limit (MW).
    pub power_mw: f64,
    /// State of charge at hour 0 (MWh).
    pub initial_soc_mwh: f64,
    /// Round-trip efficiency in (0, 1].
    pub efficiency: f64,
    /// Evening reserve window start, hour-of-day (inclusive).
    pub evening_start: usize,
    /// Evening reserve window end, hour-of-day (exclusive).
    pub evening_end: usize,
    /// Reserve floor inside the evening window, as a fraction of capacity.
    pub evening_floor_fraction: f64,
}

impl BatterySpec {
    /// A zero-capacity battery: never charges, never discharges.
    pub fn none() -> Self {
        Self {
            capacity_mwh: 0.0,
            power_mw: 0.0,
            initial_soc_mwh: 0.0,
            efficiency: 1.0,
            evening_start: 0,
            evening_end: 0,
            evening_floor_fraction: 0.0,
        }
    }

    /// One-way efficiency factor applied to each direction's SoC delta.
    pub fn one_way_efficiency(&self) -> f64 {
        self.efficiency.sqrt()
    }

    /// Returns `true` when the hour-of-day falls inside `[start, end)`.
    pub fn in_evening_window(&self, hour: usize) -> bool {
        let hod = hour % 24;
        hod >= self.evening_start && hod < self.evening_end
    }

    /// Maximum bus-side charge power given the current SoC (MW).
    ///
    /// Bounded by the power limit and by the remaining capacity headroom
    /// inflated for charge losses.
    pub fn max_charge_mw(&self, soc_mwh: f64) -> f64 {
        let headroom = (self.capacity_mwh - soc_mwh).max(0.0);
        self.power_mw.min(headroom / self.one_way_efficiency())
    }

    /// Maximum bus-side discharge power given the current SoC and the
    /// reserve floor for this hour (MW).
    ///
    /// SoC below the floor contributes nothing: discharge is 0 even when a
    /// deficit exists.
    pub fn max_discharge_mw(&self, soc_mwh: f64, floor_mwh: f64) -> f64 {
        let available = (soc_mwh - floor_mwh).max(0.0);
        self.power_mw.min(available * self.one_way_efficiency())
    }

    /// SoC after charging at `charge_mw` for one hour.
    pub fn soc_after_charge(&self, soc_mwh: f64, charge_mw: f64) -> f64 {
        (soc_mwh + charge_mw * self.one_way_efficiency()).min(self.capacity_mwh)
    }

    /// SoC after discharging at `discharge_mw` for one hour.
    pub fn soc_after_discharge(&self, soc_mwh: f64, discharge_mw: f64) -> f64 {
        (soc_mwh - discharge_mw / self.one_way_efficiency()).max(0.0)
    }

    pub(crate) fn validate(&self, region: &str) -> Result<(), ConfigError> {
        let err = |field: &'static str, message: String| ConfigError::Battery {
            region: region.to_string(),
            field,
            message,
        };

        if !self.capacity_mwh.is_finite() || self.capacity_mwh < 0.0 {
            return Err(err(
                "capacity_mwh",
                format!("is {}, must be >= 0", self.capacity_mwh),
            ));
        }
        if !self.power_mw.is_finite() || self.power_mw < 0.0 {
            return Err(err("power_mw", format!("is {}, must be >= 0", self.power_mw)));
        }
        if !self.initial_soc_mwh.is_finite()
            || self.initial_soc_mwh < 0.0
            || self.initial_soc_mwh > self.capacity_mwh
        {
            return Err(err(
                "initial_soc_mwh",
                format!(
                    "is {}, must be within [0, {}]",
                    self.initial_soc_mwh, self.capacity_mwh
                ),
            ));
        }
        if !self.efficiency.is_finite() || self.efficiency <= 0.0 || self.efficiency > 1.0 {
            return Err(err(
                "efficiency",
                format!("is {}, must be within (0, 1]", self.efficiency),
            ));
        }
        if !(0.0..=1.0).contains(&self.evening_floor_fraction) {
            return Err(err(
                "evening_floor_fraction",
                format!(
                    "is {}, must be within [0, 1]",
                    self.evening_floor_fraction
                ),
            ));
        }
        if self.evening_start > self.evening_end || self.evening_end > 24 {
            return Err(err(
                "evening_window",
                format!(
                    "is [{}, {}), must satisfy start <= end <= 24",
                    self.evening_start, self.evening_end
                ),
            ));
        }
        Ok(())
    }
}
