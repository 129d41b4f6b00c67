//! `McArthur` danger index values and rating boundaries

mod common;

use approx::assert_abs_diff_eq;
use bushfire_risk_core::core_types::fire_danger::fdi_thresholds;
use bushfire_risk_core::{classify_rating, compute_fdi, FireDangerRating, WeatherCondition};

#[test]
fn fdi_closed_form() {
    let expected = 2.0
        * (-0.45 + 0.987 * 10.0_f64.ln() - 0.0345 * 20.0 + 0.0338 * 40.0 + 0.0234 * 30.0).exp();
    assert_abs_diff_eq!(compute_fdi(40.0, 20.0, 30.0, 10.0), expected, epsilon = 1e-6);
}

#[test]
fn every_threshold_is_exact() {
    let boundaries = [
        (fdi_thresholds::MODERATE, FireDangerRating::Low, FireDangerRating::Moderate),
        (fdi_thresholds::HIGH, FireDangerRating::Moderate, FireDangerRating::High),
        (fdi_thresholds::VERY_HIGH, FireDangerRating::High, FireDangerRating::VeryHigh),
        (fdi_thresholds::SEVERE, FireDangerRating::VeryHigh, FireDangerRating::Severe),
        (fdi_thresholds::EXTREME, FireDangerRating::Severe, FireDangerRating::Extreme),
        (fdi_thresholds::CATASTROPHIC, FireDangerRating::Extreme, FireDangerRating::Catastrophic),
    ];
    for (threshold, below, at) in boundaries {
        assert_eq!(classify_rating(threshold), at, "at {threshold}");
        assert_eq!(classify_rating(threshold - 1e-9), below, "just below {threshold}");
    }
}

#[test]
fn fdi_rises_with_heat_wind_and_drought() {
    let base = compute_fdi(30.0, 30.0, 20.0, 5.0);
    assert!(compute_fdi(35.0, 30.0, 20.0, 5.0) > base);
    assert!(compute_fdi(30.0, 30.0, 40.0, 5.0) > base);
    assert!(compute_fdi(30.0, 30.0, 20.0, 8.0) > base);
    assert!(compute_fdi(30.0, 60.0, 20.0, 5.0) < base);
}

#[test]
fn weather_convenience_matches_free_function() {
    let weather = WeatherCondition::new(36.0, 18.0, 42.0, 300.0);
    assert_eq!(weather.fdi(9.0), compute_fdi(36.0, 18.0, 42.0, 9.0));
    assert_eq!(weather.rating(9.0), classify_rating(weather.fdi(9.0)));
}
