//! Inter-region transfer links.

use crate::error::ConfigError;

/// A bidirectional transfer link between an unordered pair of regions.
///
/// Flow on a link within one hour is a single signed value bounded by
/// `capacity_mw` in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLink {
    /// One endpoint region name.
    pub a: String,
    /// Other endpoint region name.
    pub b: String,
    /// Capacity in either direction (MW).
    pub capacity_mw: f64,
}

impl TransferLink {
    pub fn new(a: impl Into<String>, b: impl Into<String>, capacity_mw: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            capacity_mw,
        }
    }

    /// Returns `true` when this link connects the two named regions,
    /// in either orientation.
    pub fn connects(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub(crate) fn validate(&self, region_names: &[String]) -> Result<(), ConfigError> {
        let err = |message: String| ConfigError::Link {
            a: self.a.clone(),
            b: self.b.clone(),
            message,
        };

        if self.a == self.b {
            return Err(err("connects a region to itself".to_string()));
        }
        if !self.capacity_mw.is_finite() || self.capacity_mw < 0.0 {
            return Err(err(format!(
                "capacity is {}, must be >= 0",
                self.capacity_mw
            )));
        }
        for endpoint in [&self.a, &self.b] {
            if !region_names.iter().any(|n| n == endpoint) {
                return Err(ConfigError::UnknownRegion {
                    region: endpoint.clone(),
                    context: "transfer link",
                });
            }
        }
        Ok(())
    }
}
