//! Forward-looking minimum-SoC reservation curve.

use crate::grid::{BatterySpec, RegionSeries};

/// Fraction of battery capacity rationed across future deficit hours.
const RATION_FRACTION: f64 = 0.5;

/// Builds the per-hour minimum-SoC target curve for one region (MWh).
///
/// The curve is advisory: it caps the dispatch engine's discharge for each
/// hour but moves no energy itself.
///
/// For hour `h`, the scarcity component reserves a share of the battery
/// proportional to how much of the horizon's total projected deficit
/// (`max(0, load - renewable)`) still lies ahead, so the battery is rationed
/// across all future deficit hours instead of exhausted on the first one.
/// Inside the evening window the target is raised to at least
/// `evening_floor_fraction * capacity`. Targets never exceed capacity.
///
/// A zero-capacity battery yields an all-zero curve; so does a horizon with
/// no projected deficit outside the evening window.
pub fn target_curve(battery: &BatterySpec, series: &RegionSeries) -> Vec<f64> {
    let horizon = series.load.len();
    let mut targets = Vec::with_capacity(horizon);

    let deficits: Vec<f64> = (0..horizon).map(|h| series.deficit(h)).collect();
    let total_deficit: f64 = deficits.iter().sum();

    let mut remaining = total_deficit;
    for h in 0..horizon {
        let scarcity = if total_deficit > 0.0 {
            RATION_FRACTION * battery.capacity_mwh * (remaining / total_deficit)
        } else {
            0.0
        };

        let target = if battery.in_evening_window(h) {
            scarcity.max(battery.evening_floor_fraction * battery.capacity_mwh)
        } else {
            scarcity
        };

        targets.push(target.min(battery.capacity_mwh));
        remaining -= deficits[h];
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery(capacity: f64, floor: f64, window: (usize, usize)) -> BatterySpec {
        BatterySpec {
            capacity_mwh: capacity,
            power_mw: capacity / 4.0,
            initial_soc_mwh: capacity / 2.0,
            efficiency: 1.0,
            evening_start: window.0,
            evening_end: window.1,
            evening_floor_fraction: floor,
        }
    }

    #[test]
    fn zero_capacity_yields_zero_targets() {
        let series = RegionSeries::new(vec![100.0; 24], vec![0.0; 24], vec![0.0; 24]);
        let curve = target_curve(&battery(0.0, 0.4, (17, 21)), &series);
        assert!(curve.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn no_deficit_outside_window_yields_zero() {
        let series = RegionSeries::new(vec![10.0; 24], vec![20.0; 24], vec![5.0; 24]);
        let curve = target_curve(&battery(100.0, 0.4, (17, 21)), &series);
        for (h, &t) in curve.iter().enumerate() {
            if (17..21).contains(&h) {
                assert_eq!(t, 40.0, "evening floor applies at hour {h}");
            } else {
                assert_eq!(t, 0.0, "hour {h}");
            }
        }
    }

    #[test]
    fn scarcity_share_decays_as_deficits_pass() {
        // all deficit concentrated in hours 0 and 1, equally
        let mut load = vec![0.0; 24];
        load[0] = 50.0;
        load[1] = 50.0;
        let series = RegionSeries::new(load, vec![0.0; 24], vec![0.0; 24]);
        let curve = target_curve(&battery(100.0, 0.0, (0, 0)), &series);
        assert_eq!(curve[0], 50.0); // full ration: all deficit still ahead
        assert_eq!(curve[1], 25.0); // half remains
        assert_eq!(curve[2], 0.0); // nothing left to reserve for
    }

    #[test]
    fn evening_floor_dominates_after_scarcity_passes() {
        // the only deficit is at hour 0, so from hour 1 on the scarcity
        // component is 0 and the window floor is what remains
        let mut load = vec![0.0; 24];
        load[0] = 10.0;
        let series = RegionSeries::new(load, vec![0.0; 24], vec![0.0; 24]);
        let curve = target_curve(&battery(100.0, 0.4, (17, 21)), &series);
        assert_eq!(curve[0], 50.0);
        assert_eq!(curve[10], 0.0);
        assert_eq!(curve[18], 40.0);
    }

    #[test]
    fn targets_never_exceed_capacity() {
        let series = RegionSeries::new(vec![1000.0; 24], vec![0.0; 24], vec![0.0; 24]);
        let b = battery(100.0, 1.0, (0, 24));
        let curve = target_curve(&b, &series);
        assert!(curve.iter().all(|&t| t <= 100.0));
        assert_eq!(curve[0], 100.0);
    }

    #[test]
    fn curve_length_matches_horizon() {
        let series = RegionSeries::new(vec![1.0; 48], vec![0.0; 48], vec![0.0; 48]);
        assert_eq!(target_curve(&battery(10.0, 0.4, (17, 21)), &series).len(), 48);
    }
}
