//! Per-region hourly load and renewable generation series.

use crate::error::ConfigError;

/// Hourly load, solar, and wind magnitudes for one region, all of horizon
/// length H.
///
/// Values are non-negative MW averages over the hour, so each entry doubles
/// as MWh of energy for that hour.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    /// Demand per hour (MW).
    pub load: Vec<f64>,
    /// Solar generation per hour (MW).
    pub solar: Vec<f64>,
    /// Wind generation per hour (MW).
    pub wind: Vec<f64>,
}

impl RegionSeries {
    /// Creates a series bundle without validating it; validation happens
    /// when the owning `GridConfig` is constructed.
    pub fn new(load: Vec<f64>, solar: Vec<f64>, wind: Vec<f64>) -> Self {
        Self { load, solar, wind }
    }

    /// Total renewable generation for one hour (MW).
    pub fn renewable(&self, hour: usize) -> f64 {
        self.solar[hour] + self.wind[hour]
    }

    /// Projected deficit for one hour: load minus renewable, clipped at 0.
    pub fn deficit(&self, hour: usize) -> f64 {
        (self.load[hour] - self.renewable(hour)).max(0.0)
    }

    /// Checks lengths against the horizon and rejects negative magnitudes.
    pub(crate) fn validate(&self, region: &str, horizon: usize) -> Result<(), ConfigError> {
        for (name, values) in [
            ("load", &self.load),
            ("solar", &self.solar),
            ("wind", &self.wind),
        ] {
            if values.len() != horizon {
                return Err(ConfigError::SeriesLength {
                    region: region.to_string(),
                    series: name,
                    got: values.len(),
                    expected: horizon,
                });
            }
            for (hour, &value) in values.iter().enumerate() {
                if value < 0.0 || !value.is_finite() {
                    return Err(ConfigError::NegativeSeries {
                        region: region.to_string(),
                        series: name,
                        hour,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> RegionSeries {
        RegionSeries::new(vec![100.0, 80.0], vec![30.0, 0.0], vec![10.0, 5.0])
    }

    #[test]
    fn renewable_sums_solar_and_wind() {
        let s = series();
        assert_eq!(s.renewable(0), 40.0);
        assert_eq!(s.renewable(1), 5.0);
    }

    #[test]
    fn deficit_clips_at_zero() {
        let s = RegionSeries::new(vec![10.0, 50.0], vec![30.0, 0.0], vec![0.0, 20.0]);
        assert_eq!(s.deficit(0), 0.0);
        assert_eq!(s.deficit(1), 30.0);
    }

    #[test]
    fn validate_accepts_matching_lengths() {
        assert!(series().validate("CA", 2).is_ok());
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let err = series().validate("CA", 3).unwrap_err();
        assert!(matches!(err, ConfigError::SeriesLength { expected: 3, .. }));
    }

    #[test]
    fn validate_rejects_negative_load() {
        let s = RegionSeries::new(vec![-1.0, 2.0], vec![0.0, 0.0], vec![0.0, 0.0]);
        let err = s.validate("CA", 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeSeries {
                series: "load",
                hour: 0,
                ..
            }
        ));
    }
}
