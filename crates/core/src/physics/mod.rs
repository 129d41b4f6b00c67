//! Per-cell fire physics: ignition probability and fuel consumption
//!
//! Pure functions of weather, terrain and [`crate::solver::SpreadParams`]. The
//! spread model in [`crate::solver`] composes them over the whole grid.

pub mod combustion;
pub mod ignition;

pub use combustion::{burn_step, consumption_rate, BurnResult};
pub use ignition::{
    combine_probabilities, humidity_factor, moisture_factor, neighbor_ignition_probability,
    rainfall_factor, slope_factor, SpreadConditions, temperature_factor, weather_factor, wind_factor,
};
