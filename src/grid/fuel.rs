//! Rate-limited fossil-fuel generation.

use crate::error::ConfigError;

/// A fuel plant with a per-hour generation ceiling (MW).
///
/// Fuel carries no stored inventory; output in any hour is bounded only by
/// that hour's capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelPlant {
    capacity_mw: Vec<f64>,
}

impl FuelPlant {
    /// Creates a plant from a per-hour capacity series.
    pub fn new(capacity_mw: Vec<f64>) -> Self {
        Self { capacity_mw }
    }

    /// Creates a plant with a constant ceiling across the horizon.
    pub fn constant(capacity_mw: f64, horizon: usize) -> Self {
        Self {
            capacity_mw: vec![capacity_mw; horizon],
        }
    }

    /// Generation ceiling for one hour (MW).
    pub fn capacity_at(&self, hour: usize) -> f64 {
        self.capacity_mw[hour]
    }

    pub(crate) fn validate(&self, region: &str, horizon: usize) -> Result<(), ConfigError> {
        if self.capacity_mw.len() != horizon {
            return Err(ConfigError::SeriesLength {
                region: region.to_string(),
                series: "fuel_capacity",
                got: self.capacity_mw.len(),
                expected: horizon,
            });
        }
        for (hour, &value) in self.capacity_mw.iter().enumerate() {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::NegativeSeries {
                    region: region.to_string(),
                    series: "fuel_capacity",
                    hour,
                    value,
                });
            }
        }
        Ok(())
    }
}
