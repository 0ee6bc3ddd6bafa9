//! Shared test fixtures for integration tests.

use grid_dispatch::grid::{
    BatterySpec, FuelPlant, GridConfig, Region, RegionSeries, TransferLink,
};

/// Battery with unit efficiency and no evening reserve.
pub fn plain_battery(capacity_mwh: f64, power_mw: f64, initial_soc_mwh: f64) -> BatterySpec {
    BatterySpec {
        capacity_mwh,
        power_mw,
        initial_soc_mwh,
        efficiency: 1.0,
        evening_start: 0,
        evening_end: 0,
        evening_floor_fraction: 0.0,
    }
}

/// Region with constant fuel capacity and explicit series.
pub fn region(
    name: &str,
    load: Vec<f64>,
    solar: Vec<f64>,
    wind: Vec<f64>,
    fuel_mw: f64,
    battery: BatterySpec,
) -> Region {
    let horizon = load.len();
    Region {
        name: name.to_string(),
        series: RegionSeries::new(load, solar, wind),
        battery,
        fuel: FuelPlant::constant(fuel_mw, horizon),
    }
}

/// Single region, two hours, fuel short of load, storage covering the gap.
pub fn storage_bridge_grid() -> GridConfig {
    GridConfig::new(
        2,
        vec![region(
            "solo",
            vec![100.0, 100.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            80.0,
            plain_battery(100.0, 50.0, 100.0),
        )],
        vec![],
    )
    .expect("fixture grid is valid")
}

/// Exporter/importer pair joined by one link of the given capacity.
pub fn linked_pair_grid(link_capacity_mw: f64) -> GridConfig {
    GridConfig::new(
        2,
        vec![
            region(
                "exporter",
                vec![0.0, 0.0],
                vec![200.0, 200.0],
                vec![0.0, 0.0],
                0.0,
                BatterySpec::none(),
            ),
            region(
                "importer",
                vec![150.0, 150.0],
                vec![0.0, 0.0],
                vec![0.0, 0.0],
                0.0,
                BatterySpec::none(),
            ),
        ],
        vec![TransferLink::new("exporter", "importer", link_capacity_mw)],
    )
    .expect("fixture grid is valid")
}
