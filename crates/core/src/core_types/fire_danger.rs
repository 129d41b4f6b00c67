//! Fire danger index formulas and rating classification
//!
//! Stateless helpers used to label weather scenarios for reporting and, when
//! requested, to weight Monte Carlo sampling toward dangerous weather.
//!
//! # `McArthur` Forest Fire Danger Index (Mark 5)
//!
//! ```text
//! FDI = 2.0 × exp(-0.45 + 0.987×ln(D) - 0.0345×H + 0.0338×T + 0.0234×V)
//! ```
//!
//! - **D** = Drought Factor (1-10)
//! - **H** = Relative Humidity (%)
//! - **T** = Air Temperature (°C)
//! - **V** = Wind Speed (km/h)
//!
//! Reference: Noble et al. (1980) - "`McArthur`'s fire-danger meters expressed
//! as equations", Australian Journal of Ecology, 5(2), 201-203

use serde::{Deserialize, Serialize};
use std::fmt;

/// FDI threshold constants separating the rating categories.
///
/// Each category includes its lower bound and excludes its upper bound, so an
/// index of exactly `12.0` rates `High`.
pub mod fdi_thresholds {
    /// Lower bound of "Moderate"
    pub const MODERATE: f64 = 5.0;
    /// Lower bound of "High"
    pub const HIGH: f64 = 12.0;
    /// Lower bound of "Very High"
    pub const VERY_HIGH: f64 = 25.0;
    /// Lower bound of "Severe"
    pub const SEVERE: f64 = 50.0;
    /// Lower bound of "Extreme"
    pub const EXTREME: f64 = 75.0;
    /// Lower bound of "Catastrophic" (Code Red)
    pub const CATASTROPHIC: f64 = 100.0;
}

/// Drought factor range produced by [`drought_factor_from_rainfall`]
pub const DROUGHT_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

/// Ordered fire danger rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FireDangerRating {
    /// FDI < 5
    Low,
    /// 5 ≤ FDI < 12
    Moderate,
    /// 12 ≤ FDI < 25
    High,
    /// 25 ≤ FDI < 50
    VeryHigh,
    /// 50 ≤ FDI < 75
    Severe,
    /// 75 ≤ FDI < 100
    Extreme,
    /// FDI ≥ 100
    Catastrophic,
}

impl FireDangerRating {
    /// All ratings in ascending order
    pub const ALL: [FireDangerRating; 7] = [
        FireDangerRating::Low,
        FireDangerRating::Moderate,
        FireDangerRating::High,
        FireDangerRating::VeryHigh,
        FireDangerRating::Severe,
        FireDangerRating::Extreme,
        FireDangerRating::Catastrophic,
    ];

    /// Map an index value to its rating.
    ///
    /// NaN rates `Low`; callers feeding NaN have bigger problems than the label.
    pub fn classify(fdi: f64) -> Self {
        use fdi_thresholds as t;
        match fdi {
            _ if fdi >= t::CATASTROPHIC => FireDangerRating::Catastrophic,
            _ if fdi >= t::EXTREME => FireDangerRating::Extreme,
            _ if fdi >= t::SEVERE => FireDangerRating::Severe,
            _ if fdi >= t::VERY_HIGH => FireDangerRating::VeryHigh,
            _ if fdi >= t::HIGH => FireDangerRating::High,
            _ if fdi >= t::MODERATE => FireDangerRating::Moderate,
            _ => FireDangerRating::Low,
        }
    }

    /// Human-readable label as used on public fire danger signage
    pub const fn label(self) -> &'static str {
        match self {
            FireDangerRating::Low => "Low",
            FireDangerRating::Moderate => "Moderate",
            FireDangerRating::High => "High",
            FireDangerRating::VeryHigh => "Very High",
            FireDangerRating::Severe => "Severe",
            FireDangerRating::Extreme => "Extreme",
            FireDangerRating::Catastrophic => "Catastrophic",
        }
    }
}

impl fmt::Display for FireDangerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compute the `McArthur` Mark 5 Forest Fire Danger Index.
///
/// All inputs are used as given, except that a drought factor of zero,
/// negative or NaN is replaced by 1 so `ln()` stays defined.
pub fn compute_fdi(temperature: f64, humidity: f64, wind_speed: f64, drought_factor: f64) -> f64 {
    let df = if drought_factor > 0.0 { drought_factor } else { 1.0 };

    let exponent = -0.45 + 0.987 * df.ln() - 0.0345 * humidity
        + 0.0338 * temperature
        + 0.0234 * wind_speed;

    2.0 * exponent.exp()
}

/// Classify an index value; see [`FireDangerRating::classify`]
#[inline]
pub fn classify_rating(fdi: f64) -> FireDangerRating {
    FireDangerRating::classify(fdi)
}

/// `McArthur` Mark 3 Grassland Fire Danger Index
///
/// * `fuel_load` - grass fuel load (t/ha)
/// * `fuel_moisture` - grass moisture content (%)
pub fn grassland_fdi(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    fuel_load: f64,
    fuel_moisture: f64,
) -> f64 {
    3.35 * fuel_load
        * (-0.0231 * fuel_moisture).exp()
        * (0.054 + 0.209 * wind_speed)
        * (0.0365 * temperature - 0.0345 * humidity).exp()
}

/// Approximate drought factor from recent rainfall (mm): every 10 mm knocks
/// one point off a fully cured 10.
pub fn drought_factor_from_rainfall(rainfall: f64) -> f64 {
    (10.0 - rainfall.max(0.0) / 10.0).clamp(*DROUGHT_FACTOR_RANGE.start(), *DROUGHT_FACTOR_RANGE.end())
}
