//! Neighbor-to-neighbor ignition probability
//!
//! A burning cell independently tries to ignite each 8-adjacent vegetation
//! cell. The probability of one attempt is a product of dimensionless factors:
//!
//! ```text
//! p = base × wind × humidity × moisture × temperature × rain × slope × flammability
//! ```
//!
//! Every factor is non-negative and the product is clamped to `[0, 1]`.
//! Weather passed in here must already be clamped into its valid domain.

use crate::core_types::{VegetationClass, WeatherCondition};
use crate::grid::NeighborOffset;
use crate::solver::SpreadParams;
use nalgebra::Vector2;

/// Wind alignment factor `1 + k·(v/10)·max(0, cos θ)`
///
/// `θ` is the angle between the wind heading and the source→target offset.
/// Downwind targets are favored; crosswind and upwind targets get the neutral
/// factor 1, so the result never decreases as wind speed rises.
pub fn wind_factor(
    params: &SpreadParams,
    wind_speed: f64,
    heading: &Vector2<f64>,
    offset: NeighborOffset,
) -> f64 {
    let alignment = heading.dot(&offset.direction()).max(0.0);
    1.0 + params.wind_coefficient * (wind_speed / 10.0) * alignment
}

/// Dry air spreads fire; saturated air damps it
#[inline]
pub fn humidity_factor(params: &SpreadParams, humidity: f64) -> f64 {
    (params.humidity_offset - humidity / 100.0).max(0.0)
}

/// Exponential damping by dead fuel moisture content
#[inline]
pub fn moisture_factor(params: &SpreadParams, fuel_moisture: f64) -> f64 {
    (-params.fuel_moisture_decay * fuel_moisture).exp()
}

#[inline]
pub fn temperature_factor(params: &SpreadParams, temperature: f64) -> f64 {
    (params.temperature_base + temperature / params.temperature_scale).max(0.0)
}

#[inline]
pub fn rainfall_factor(params: &SpreadParams, rainfall: f64) -> f64 {
    (-params.rainfall_decay * rainfall).exp()
}

/// Upslope favored: `max(0, 1 + k·rise/run)`
///
/// `rise` is target elevation minus source elevation, `run` the horizontal
/// distance between cell centers (both metres).
pub fn slope_factor(params: &SpreadParams, rise: f64, run: f64) -> f64 {
    if run <= 0.0 {
        return 1.0;
    }
    (1.0 + params.slope_coefficient * rise / run).max(0.0)
}

/// Weather-only part of the ignition probability, shared by every pair of
/// cells in one step
pub fn weather_factor(params: &SpreadParams, weather: &WeatherCondition) -> f64 {
    humidity_factor(params, weather.humidity)
        * moisture_factor(params, weather.fuel_moisture)
        * temperature_factor(params, weather.temperature)
        * rainfall_factor(params, weather.rainfall)
}

/// Step-invariant part of the ignition probability
///
/// Weather is fixed for a whole step, so the weather factor and wind heading
/// are computed once and reused for every source/target pair.
#[derive(Debug, Clone, Copy)]
pub struct SpreadConditions {
    scaled_base: f64,
    heading: Vector2<f64>,
    wind_speed: f64,
}

impl SpreadConditions {
    pub fn new(params: &SpreadParams, weather: &WeatherCondition) -> Self {
        SpreadConditions {
            scaled_base: params.base_spread_probability * weather_factor(params, weather),
            heading: weather.wind_heading(),
            wind_speed: weather.wind_speed,
        }
    }

    /// Probability for one source/target pair; `offset` points from the
    /// burning source to the target
    pub fn probability(
        &self,
        params: &SpreadParams,
        target: VegetationClass,
        offset: NeighborOffset,
        rise: f64,
        run: f64,
    ) -> f64 {
        let p = self.scaled_base
            * wind_factor(params, self.wind_speed, &self.heading, offset)
            * slope_factor(params, rise, run)
            * target.flammability();

        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }
}

/// Probability that one burning source ignites one vegetation target
pub fn neighbor_ignition_probability(
    params: &SpreadParams,
    weather: &WeatherCondition,
    target: VegetationClass,
    offset: NeighborOffset,
    rise: f64,
    run: f64,
) -> f64 {
    SpreadConditions::new(params, weather).probability(params, target, offset, rise, run)
}

/// Independent trials: `1 - Π(1 - p_i)`
pub fn combine_probabilities<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let miss: f64 = probabilities
        .into_iter()
        .map(|p| 1.0 - p.clamp(0.0, 1.0))
        .product();
    (1.0 - miss).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NEIGHBOR_OFFSETS;
    use approx::assert_relative_eq;

    const EAST: NeighborOffset = NeighborOffset { dx: 1, dy: 0 };
    const WEST: NeighborOffset = NeighborOffset { dx: -1, dy: 0 };

    fn probability(weather: &WeatherCondition, offset: NeighborOffset) -> f64 {
        neighbor_ignition_probability(
            &SpreadParams::default(),
            weather,
            VegetationClass::Moderate,
            offset,
            0.0,
            30.0,
        )
    }

    #[test]
    fn test_non_decreasing_in_wind_speed() {
        for offset in NEIGHBOR_OFFSETS {
            let mut last = 0.0;
            for speed in (0..=200).step_by(5) {
                let weather = WeatherCondition::new(30.0, 30.0, f64::from(speed), 90.0);
                let p = probability(&weather, offset);
                assert!(p >= last, "offset {offset:?} speed {speed}: {p} < {last}");
                last = p;
            }
        }
    }

    #[test]
    fn test_non_increasing_in_humidity_and_moisture() {
        let mut last = f64::INFINITY;
        for humidity in (0..=100).step_by(5) {
            let weather = WeatherCondition::new(30.0, f64::from(humidity), 20.0, 90.0);
            let p = probability(&weather, EAST);
            assert!(p <= last, "humidity {humidity}");
            last = p;
        }

        let mut last = f64::INFINITY;
        for moisture in (0..=100).step_by(5) {
            let weather =
                WeatherCondition::new(30.0, 30.0, 20.0, 90.0).with_fuel_moisture(f64::from(moisture));
            let p = probability(&weather, EAST);
            assert!(p <= last, "fuel moisture {moisture}");
            last = p;
        }
    }

    #[test]
    fn test_downwind_beats_upwind() {
        let weather = WeatherCondition::new(30.0, 30.0, 40.0, 90.0);
        assert!(probability(&weather, EAST) > probability(&weather, WEST));

        // Upwind gets the neutral factor, not a penalty
        let heading = weather.wind_heading();
        assert_relative_eq!(wind_factor(&SpreadParams::default(), 40.0, &heading, WEST), 1.0);
        assert_relative_eq!(
            wind_factor(&SpreadParams::default(), 40.0, &heading, EAST),
            5.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_upslope_favored() {
        let params = SpreadParams::default();
        assert!(slope_factor(&params, 10.0, 30.0) > slope_factor(&params, 0.0, 30.0));
        assert!(slope_factor(&params, -10.0, 30.0) < 1.0);
        assert_eq!(slope_factor(&params, -100.0, 30.0), 0.0);
    }

    #[test]
    fn test_probability_clamped() {
        let p = probability(&WeatherCondition::catastrophic(), NeighborOffset { dx: 1, dy: -1 });
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_combine_independent_trials() {
        assert_eq!(combine_probabilities(Vec::<f64>::new()), 0.0);
        assert_relative_eq!(combine_probabilities([0.5, 0.5]), 0.75);
        assert_relative_eq!(combine_probabilities([0.2]), 0.2);
        assert_eq!(combine_probabilities([0.3, 1.0]), 1.0);
    }
}
