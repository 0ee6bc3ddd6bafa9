//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::grid::{BatterySpec, FuelPlant, GridConfig, Region, RegionSeries, TransferLink};
use crate::profiles;

/// Top-level scenario parsed from TOML.
///
/// Region series are given verbatim per hour; `solar` and `wind` may be
/// omitted (all-zero), and `fuel_capacity` accepts a scalar or a per-hour
/// array. [`ScenarioConfig::build`] converts the parsed form into a
/// validated [`GridConfig`]; any constraint violation surfaces there,
/// before a simulation starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon length in hours; defaults to the first region's load length.
    pub horizon: Option<usize>,
    /// Region definitions (`[[region]]` tables).
    #[serde(rename = "region")]
    pub regions: Vec<RegionScenario>,
    /// Transfer links (`[[link]]` tables).
    #[serde(rename = "link", default)]
    pub links: Vec<LinkScenario>,
}

/// One region's scenario inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionScenario {
    pub name: String,
    /// Hourly demand (MW).
    pub load: Vec<f64>,
    /// Hourly solar generation (MW); empty means none.
    #[serde(default)]
    pub solar: Vec<f64>,
    /// Hourly wind generation (MW); empty means none.
    #[serde(default)]
    pub wind: Vec<f64>,
    /// Fuel generation ceiling: scalar or per-hour array (MW).
    #[serde(default)]
    pub fuel_capacity: FuelCapacityScenario,
    #[serde(default)]
    pub battery: BatteryScenario,
}

/// Fuel ceiling, constant or per-hour.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FuelCapacityScenario {
    Constant(f64),
    PerHour(Vec<f64>),
}

impl Default for FuelCapacityScenario {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

/// Battery parameters; defaults describe a region without storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryScenario {
    /// Energy capacity (MWh).
    pub capacity_mwh: f64,
    /// Charge/discharge power limit (MW).
    pub power_mw: f64,
    /// State of charge at hour 0 (MWh).
    pub initial_soc_mwh: f64,
    /// Round-trip efficiency (0, 1].
    pub efficiency: f64,
    /// Evening reserve window start hour-of-day (inclusive).
    pub evening_start: usize,
    /// Evening reserve window end hour-of-day (exclusive).
    pub evening_end: usize,
    /// Reserve floor inside the window, fraction of capacity.
    pub evening_floor_fraction: f64,
}

impl Default for BatteryScenario {
    fn default() -> Self {
        Self {
            capacity_mwh: 0.0,
            power_mw: 0.0,
            initial_soc_mwh: 0.0,
            efficiency: 1.0,
            evening_start: 17,
            evening_end: 21,
            evening_floor_fraction: 0.4,
        }
    }
}

/// One transfer link.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkScenario {
    pub a: String,
    pub b: String,
    pub capacity_mw: f64,
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "evening_crunch"];

    /// Three-state demo grid (CA/TX/NY) over a 48-hour horizon, with
    /// seeded synthetic profiles and the reference interconnect capacities.
    pub fn demo() -> Self {
        const H: usize = 48;
        Self {
            horizon: Some(H),
            regions: vec![
                RegionScenario {
                    name: "CA".to_string(),
                    load: profiles::load_profile(28_000.0, 6_000.0, 2.9, 500.0, H, 11),
                    solar: profiles::solar_profile(25_000.0, 6, 19, 0.08, H, 12),
                    wind: profiles::wind_profile(4_000.0, 800.0, H, 13),
                    fuel_capacity: FuelCapacityScenario::Constant(16_000.0),
                    battery: BatteryScenario {
                        capacity_mwh: 12_000.0,
                        power_mw: 4_000.0,
                        initial_soc_mwh: 7_000.0,
                        efficiency: 0.88,
                        ..BatteryScenario::default()
                    },
                },
                RegionScenario {
                    name: "TX".to_string(),
                    load: profiles::load_profile(45_000.0, 8_000.0, 2.8, 700.0, H, 21),
                    solar: profiles::solar_profile(9_000.0, 6, 19, 0.08, H, 22),
                    wind: profiles::wind_profile(12_000.0, 2_500.0, H, 23),
                    fuel_capacity: FuelCapacityScenario::Constant(30_000.0),
                    battery: BatteryScenario {
                        capacity_mwh: 8_000.0,
                        power_mw: 3_000.0,
                        initial_soc_mwh: 4_000.0,
                        efficiency: 0.88,
                        ..BatteryScenario::default()
                    },
                },
                RegionScenario {
                    name: "NY".to_string(),
                    load: profiles::load_profile(18_000.0, 4_000.0, 3.0, 300.0, H, 31),
                    solar: profiles::solar_profile(3_500.0, 7, 18, 0.08, H, 32),
                    wind: profiles::wind_profile(2_500.0, 600.0, H, 33),
                    fuel_capacity: FuelCapacityScenario::Constant(12_000.0),
                    battery: BatteryScenario {
                        capacity_mwh: 3_000.0,
                        power_mw: 1_200.0,
                        initial_soc_mwh: 1_500.0,
                        efficiency: 0.90,
                        ..BatteryScenario::default()
                    },
                },
            ],
            links: vec![
                LinkScenario {
                    a: "CA".to_string(),
                    b: "TX".to_string(),
                    capacity_mw: 2_000.0,
                },
                LinkScenario {
                    a: "CA".to_string(),
                    b: "NY".to_string(),
                    capacity_mw: 1_500.0,
                },
                LinkScenario {
                    a: "TX".to_string(),
                    b: "NY".to_string(),
                    capacity_mw: 2_500.0,
                },
            ],
        }
    }

    /// Two-region preset with an undersized fuel fleet: the evening peak
    /// forces hard battery rationing and some unserved energy.
    pub fn evening_crunch() -> Self {
        const H: usize = 24;
        Self {
            horizon: Some(H),
            regions: vec![
                RegionScenario {
                    name: "coast".to_string(),
                    load: profiles::load_profile(9_000.0, 2_500.0, 2.9, 150.0, H, 41),
                    solar: profiles::solar_profile(5_000.0, 6, 18, 0.06, H, 42),
                    wind: profiles::wind_profile(800.0, 200.0, H, 43),
                    fuel_capacity: FuelCapacityScenario::Constant(4_500.0),
                    battery: BatteryScenario {
                        capacity_mwh: 6_000.0,
                        power_mw: 2_000.0,
                        initial_soc_mwh: 3_000.0,
                        efficiency: 0.90,
                        evening_start: 17,
                        evening_end: 22,
                        evening_floor_fraction: 0.5,
                    },
                },
                RegionScenario {
                    name: "valley".to_string(),
                    load: profiles::load_profile(4_000.0, 900.0, 2.8, 80.0, H, 51),
                    solar: profiles::solar_profile(2_500.0, 6, 18, 0.06, H, 52),
                    wind: profiles::wind_profile(500.0, 150.0, H, 53),
                    fuel_capacity: FuelCapacityScenario::Constant(2_600.0),
                    battery: BatteryScenario {
                        capacity_mwh: 1_500.0,
                        power_mw: 600.0,
                        initial_soc_mwh: 700.0,
                        efficiency: 0.90,
                        ..BatteryScenario::default()
                    },
                },
            ],
            links: vec![LinkScenario {
                a: "coast".to_string(),
                b: "valley".to_string(),
                capacity_mw: 800.0,
            }],
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "evening_crunch" => Ok(Self::evening_crunch()),
            _ => Err(ConfigError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Scenario {
            path: path.display().to_string(),
            message: format!("cannot read file: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Scenario {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Scenario {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Converts the parsed scenario into a validated [`GridConfig`].
    ///
    /// # Errors
    ///
    /// Returns the first constraint violation found; nothing is simulated
    /// on error.
    pub fn build(&self) -> Result<GridConfig, ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        let horizon = self.horizon.unwrap_or_else(|| self.regions[0].load.len());

        let regions = self
            .regions
            .iter()
            .map(|r| {
                let solar = if r.solar.is_empty() {
                    vec![0.0; horizon]
                } else {
                    r.solar.clone()
                };
                let wind = if r.wind.is_empty() {
                    vec![0.0; horizon]
                } else {
                    r.wind.clone()
                };
                let fuel = match &r.fuel_capacity {
                    FuelCapacityScenario::Constant(mw) => FuelPlant::constant(*mw, horizon),
                    FuelCapacityScenario::PerHour(series) => FuelPlant::new(series.clone()),
                };
                let b = &r.battery;
                Region {
                    name: r.name.clone(),
                    series: RegionSeries::new(r.load.clone(), solar, wind),
                    battery: BatterySpec {
                        capacity_mwh: b.capacity_mwh,
                        power_mw: b.power_mw,
                        initial_soc_mwh: b.initial_soc_mwh,
                        efficiency: b.efficiency,
                        evening_start: b.evening_start,
                        evening_end: b.evening_end,
                        evening_floor_fraction: b.evening_floor_fraction,
                    },
                    fuel,
                }
            })
            .collect();

        let links = self
            .links
            .iter()
            .map(|l| TransferLink::new(l.a.clone(), l.b.clone(), l.capacity_mw))
            .collect();

        GridConfig::new(horizon, regions, links)
    }
}
