//! Weather conditions driving fire spread
//!
//! Weather is supplied by the caller, either once per step or once per Monte
//! Carlo scenario. Nothing here forecasts: the only weather "model" is a
//! scenario sampler for ensemble studies.
//!
//! Out-of-domain values never fail. [`WeatherCondition::clamped`] pulls each
//! field back into its valid range and logs what it touched; validation that
//! should reach a user belongs upstream.

use super::fire_danger::{compute_fdi, FireDangerRating};
use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Valid ranges for each weather field.
///
/// Values outside these ranges are clamped to the nearest bound.
pub mod weather_ranges {
    use std::ops::RangeInclusive;

    /// Air temperature (°C)
    pub const TEMPERATURE: RangeInclusive<f64> = -50.0..=60.0;

    /// Relative humidity (%)
    pub const HUMIDITY: RangeInclusive<f64> = 0.0..=100.0;

    /// 10 m wind speed (km/h)
    pub const WIND_SPEED: RangeInclusive<f64> = 0.0..=200.0;

    /// Rainfall over the last 24 h (mm)
    pub const RAINFALL: RangeInclusive<f64> = 0.0..=500.0;

    /// Dead fuel moisture content (%)
    pub const FUEL_MOISTURE: RangeInclusive<f64> = 0.0..=100.0;
}

/// One weather scenario
///
/// `wind_direction` is the compass bearing the wind blows **toward**
/// (0° = north, 90° = east). North is the `y = 0` edge of the grid, so a 0°
/// wind pushes fire toward smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Wind speed (km/h)
    pub wind_speed: f64,
    /// Wind heading (degrees, `[0, 360)`)
    pub wind_direction: f64,
    /// Rainfall in the last 24 h (mm)
    pub rainfall: f64,
    /// Dead fuel moisture content (%)
    pub fuel_moisture: f64,
}

impl Default for WeatherCondition {
    fn default() -> Self {
        WeatherCondition {
            temperature: 20.0,
            humidity: 50.0,
            wind_speed: 10.0,
            wind_direction: 0.0,
            rainfall: 0.0,
            fuel_moisture: 10.0,
        }
    }
}

impl WeatherCondition {
    /// Create a dry-day scenario (no rain, fuel moisture 10%)
    pub fn new(temperature: f64, humidity: f64, wind_speed: f64, wind_direction: f64) -> Self {
        WeatherCondition {
            temperature,
            humidity,
            wind_speed,
            wind_direction,
            ..Default::default()
        }
    }

    /// Builder-style rainfall override
    pub fn with_rainfall(mut self, rainfall: f64) -> Self {
        self.rainfall = rainfall;
        self
    }

    /// Builder-style fuel moisture override
    pub fn with_fuel_moisture(mut self, fuel_moisture: f64) -> Self {
        self.fuel_moisture = fuel_moisture;
        self
    }

    /// Black Summer style day: 47°C, 8% RH, 80 km/h NE wind, bone-dry fuel
    pub fn catastrophic() -> Self {
        WeatherCondition {
            temperature: 47.0,
            humidity: 8.0,
            wind_speed: 80.0,
            wind_direction: 45.0,
            rainfall: 0.0,
            fuel_moisture: 3.0,
        }
    }

    /// Mild autumn day with recent rain
    pub fn mild() -> Self {
        WeatherCondition {
            temperature: 18.0,
            humidity: 70.0,
            wind_speed: 8.0,
            wind_direction: 180.0,
            rainfall: 12.0,
            fuel_moisture: 22.0,
        }
    }

    /// Return a copy with every field inside its valid range, plus the names
    /// of the fields that had to be adjusted.
    ///
    /// Non-finite values fall back to the field's default. Wind direction is
    /// wrapped into `[0, 360)` without being reported, since every bearing is
    /// meaningful.
    pub fn sanitized(&self) -> (Self, Vec<&'static str>) {
        let defaults = WeatherCondition::default();
        let mut adjusted = Vec::new();

        let mut fix = |name: &'static str,
                       value: f64,
                       fallback: f64,
                       range: std::ops::RangeInclusive<f64>| {
            if !value.is_finite() {
                adjusted.push(name);
                return fallback;
            }
            let clamped = value.clamp(*range.start(), *range.end());
            if clamped != value {
                adjusted.push(name);
            }
            clamped
        };

        let temperature = fix(
            "temperature",
            self.temperature,
            defaults.temperature,
            weather_ranges::TEMPERATURE,
        );
        let humidity = fix(
            "humidity",
            self.humidity,
            defaults.humidity,
            weather_ranges::HUMIDITY,
        );
        let wind_speed = fix(
            "wind_speed",
            self.wind_speed,
            defaults.wind_speed,
            weather_ranges::WIND_SPEED,
        );
        let rainfall = fix(
            "rainfall",
            self.rainfall,
            defaults.rainfall,
            weather_ranges::RAINFALL,
        );
        let fuel_moisture = fix(
            "fuel_moisture",
            self.fuel_moisture,
            defaults.fuel_moisture,
            weather_ranges::FUEL_MOISTURE,
        );

        let wind_direction = if self.wind_direction.is_finite() {
            self.wind_direction.rem_euclid(360.0)
        } else {
            adjusted.push("wind_direction");
            defaults.wind_direction
        };

        (
            WeatherCondition {
                temperature,
                humidity,
                wind_speed,
                wind_direction,
                rainfall,
                fuel_moisture,
            },
            adjusted,
        )
    }

    /// Clamp into the valid domain, logging a warning if anything changed
    pub fn clamped(&self) -> Self {
        let (weather, adjusted) = self.sanitized();
        if !adjusted.is_empty() {
            warn!(
                "Weather input out of range, clamped fields {:?}: {:?} -> {:?}",
                adjusted, self, weather
            );
        }
        weather
    }

    /// Unit vector of the wind heading in grid coordinates (+x east, +y south)
    pub fn wind_heading(&self) -> Vector2<f64> {
        let bearing = self.wind_direction.to_radians();
        Vector2::new(bearing.sin(), -bearing.cos())
    }

    /// `McArthur` forest fire danger index for this weather at a given drought factor
    pub fn fdi(&self, drought_factor: f64) -> f64 {
        compute_fdi(
            self.temperature,
            self.humidity,
            self.wind_speed,
            drought_factor,
        )
    }

    /// Danger rating for this weather at a given drought factor
    pub fn rating(&self, drought_factor: f64) -> FireDangerRating {
        FireDangerRating::classify(self.fdi(drought_factor))
    }
}

/// Generate `count` plausible fire-season scenarios, deterministic per `seed`.
///
/// Temperature and humidity are drawn independently and then correlated (hot
/// days are drier); fuel moisture follows humidity.
pub fn generate_weather_scenarios(count: usize, seed: u64) -> Vec<WeatherCondition> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let temperature = rng.random_range(15.0..45.0);
            let humidity: f64 = rng.random_range(20.0..80.0);

            let adjusted_humidity = humidity * (50.0 - temperature) / 50.0;
            let fuel_moisture = (adjusted_humidity * 0.3).max(5.0);

            WeatherCondition {
                temperature,
                humidity: adjusted_humidity.max(10.0),
                wind_speed: rng.random_range(5.0..50.0),
                wind_direction: rng.random_range(0.0..360.0),
                rainfall: rng.random_range(0.0..20.0),
                fuel_moisture,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_in_range_weather_untouched() {
        let weather = WeatherCondition::new(35.0, 20.0, 40.0, 270.0);
        let (clamped, adjusted) = weather.sanitized();
        assert!(adjusted.is_empty(), "unexpected adjustments: {adjusted:?}");
        assert_eq!(clamped, weather);
    }

    #[test]
    fn test_out_of_range_weather_is_clamped() {
        let weather = WeatherCondition {
            temperature: 95.0,
            humidity: -5.0,
            wind_speed: 500.0,
            wind_direction: 400.0,
            rainfall: -1.0,
            fuel_moisture: f64::NAN,
        };
        let (clamped, adjusted) = weather.sanitized();

        assert_eq!(clamped.temperature, 60.0);
        assert_eq!(clamped.humidity, 0.0);
        assert_eq!(clamped.wind_speed, 200.0);
        assert_relative_eq!(clamped.wind_direction, 40.0);
        assert_eq!(clamped.rainfall, 0.0);
        assert_eq!(clamped.fuel_moisture, 10.0);

        for field in [
            "temperature",
            "humidity",
            "wind_speed",
            "rainfall",
            "fuel_moisture",
        ] {
            assert!(adjusted.contains(&field), "{field} not reported");
        }
        assert!(!adjusted.contains(&"wind_direction"));
    }

    #[test]
    fn test_negative_wind_direction_wraps() {
        let weather = WeatherCondition::new(25.0, 40.0, 10.0, -90.0).clamped();
        assert_relative_eq!(weather.wind_direction, 270.0);
    }

    #[test]
    fn test_wind_heading_compass() {
        let north = WeatherCondition::new(25.0, 40.0, 10.0, 0.0).wind_heading();
        assert_relative_eq!(north.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(north.y, -1.0, epsilon = 1e-12);

        let east = WeatherCondition::new(25.0, 40.0, 10.0, 90.0).wind_heading();
        assert_relative_eq!(east.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(east.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_generated_scenarios_are_deterministic_and_valid() {
        let a = generate_weather_scenarios(50, 7);
        let b = generate_weather_scenarios(50, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);

        for weather in &a {
            let (_, adjusted) = weather.sanitized();
            assert!(adjusted.is_empty(), "{weather:?} needed {adjusted:?}");
            assert!(weather.humidity >= 10.0);
            assert!(weather.fuel_moisture >= 5.0);
        }

        let c = generate_weather_scenarios(50, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn test_presets_rate_as_expected() {
        assert_eq!(
            WeatherCondition::catastrophic().rating(10.0),
            FireDangerRating::Catastrophic
        );
        assert!(WeatherCondition::mild().rating(2.0) <= FireDangerRating::Moderate);
    }
}
