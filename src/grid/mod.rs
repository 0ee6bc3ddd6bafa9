//! Grid model: regions, storage, fuel plants, and transfer topology.

/// Stationary battery storage spec.
pub mod battery;
/// Rate-limited fuel generation.
pub mod fuel;
/// Per-region hourly series.
pub mod series;
/// Inter-region transfer links.
pub mod transfer;

pub use battery::BatterySpec;
pub use fuel::FuelPlant;
pub use series::RegionSeries;
pub use transfer::TransferLink;

use crate::error::ConfigError;

/// One region: a name, its hourly series, and the infrastructure it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub series: RegionSeries,
    pub battery: BatterySpec,
    pub fuel: FuelPlant,
}

/// The validated configuration bundle for one dispatch run.
///
/// Construction via [`GridConfig::new`] is the single validation gate: a
/// value of this type is guaranteed internally consistent, so the dispatch
/// engine never re-checks inputs mid-run. Regions are held sorted by name;
/// that order is the tie-break order for transfers and the output order of
/// ledgers within an hour.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    horizon: usize,
    regions: Vec<Region>,
    links: Vec<TransferLink>,
}

impl GridConfig {
    /// Validates and assembles a configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: empty topology, zero
    /// horizon, duplicate region names, series/fuel length or sign
    /// violations, malformed battery specs, or malformed links.
    pub fn new(
        horizon: usize,
        mut regions: Vec<Region>,
        links: Vec<TransferLink>,
    ) -> Result<Self, ConfigError> {
        if regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        if horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }

        regions.sort_by(|x, y| x.name.cmp(&y.name));
        for pair in regions.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(ConfigError::DuplicateRegion {
                    region: pair[0].name.clone(),
                });
            }
        }

        for region in &regions {
            region.series.validate(&region.name, horizon)?;
            region.fuel.validate(&region.name, horizon)?;
            region.battery.validate(&region.name)?;
        }

        let names: Vec<String> = regions.iter().map(|r| r.name.clone()).collect();
        for (i, link) in links.iter().enumerate() {
            link.validate(&names)?;
            if links[..i].iter().any(|l| l.connects(&link.a, &link.b)) {
                return Err(ConfigError::Link {
                    a: link.a.clone(),
                    b: link.b.clone(),
                    message: "duplicate link between this region pair".to_string(),
                });
            }
        }

        Ok(Self {
            horizon,
            regions,
            links,
        })
    }

    /// Horizon length H in hours.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Regions in name order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Transfer links as configured.
    pub fn links(&self) -> &[TransferLink] {
        &self.links
    }

    /// Index of a region by name within the sorted region list.
    pub fn region_index(&self, name: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.name == name)
    }

    /// Transfer capacity between two regions by index (0 when unlinked).
    pub fn capacity_between(&self, i: usize, j: usize) -> f64 {
        let (a, b) = (&self.regions[i].name, &self.regions[j].name);
        self.links
            .iter()
            .find(|l| l.connects(a, b))
            .map(|l| l.capacity_mw)
            .unwrap_or(0.0)
    }

    /// Sum of battery capacities across all regions (MWh).
    pub fn total_battery_capacity_mwh(&self) -> f64 {
        self.regions.iter().map(|r| r.battery.capacity_mwh).sum()
    }

    /// Sum of link capacities (MW).
    pub fn total_link_capacity_mw(&self) -> f64 {
        self.links.iter().map(|l| l.capacity_mw).sum()
    }

    /// Decomposes the bundle for rebuilding with a modification applied.
    pub fn into_parts(self) -> (usize, Vec<Region>, Vec<TransferLink>) {
        (self.horizon, self.regions, self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str, load: f64) -> Region {
        Region {
            name: name.to_string(),
            series: RegionSeries::new(vec![load; 4], vec![0.0; 4], vec![0.0; 4]),
            battery: BatterySpec::none(),
            fuel: FuelPlant::constant(100.0, 4),
        }
    }

    #[test]
    fn regions_are_sorted_by_name() {
        let grid = GridConfig::new(4, vec![region("TX", 1.0), region("CA", 2.0)], vec![])
            .expect("valid grid");
        assert_eq!(grid.regions()[0].name, "CA");
        assert_eq!(grid.regions()[1].name, "TX");
        assert_eq!(grid.region_index("TX"), Some(1));
    }

    #[test]
    fn empty_topology_is_fatal() {
        assert_eq!(
            GridConfig::new(4, vec![], vec![]).unwrap_err(),
            ConfigError::NoRegions
        );
    }

    #[test]
    fn zero_horizon_is_fatal() {
        assert_eq!(
            GridConfig::new(0, vec![region("CA", 1.0)], vec![]).unwrap_err(),
            ConfigError::ZeroHorizon
        );
    }

    #[test]
    fn duplicate_region_names_are_fatal() {
        let err =
            GridConfig::new(4, vec![region("CA", 1.0), region("CA", 2.0)], vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRegion { .. }));
    }

    #[test]
    fn duplicate_links_are_fatal() {
        let links = vec![
            TransferLink::new("CA", "TX", 100.0),
            TransferLink::new("TX", "CA", 200.0),
        ];
        let err = GridConfig::new(4, vec![region("CA", 1.0), region("TX", 2.0)], links)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Link { .. }));
    }

    #[test]
    fn capacity_lookup_is_symmetric() {
        let grid = GridConfig::new(
            4,
            vec![region("CA", 1.0), region("TX", 2.0)],
            vec![TransferLink::new("TX", "CA", 150.0)],
        )
        .expect("valid grid");
        assert_eq!(grid.capacity_between(0, 1), 150.0);
        assert_eq!(grid.capacity_between(1, 0), 150.0);
    }
}
