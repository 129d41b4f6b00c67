//! Core types and utilities

pub mod cell;
pub mod fire_danger;
pub mod weather;

pub use cell::{Cell, CellState, VegetationClass};
pub use fire_danger::{
    classify_rating, compute_fdi, drought_factor_from_rainfall, grassland_fdi, FireDangerRating,
};
pub use weather::{generate_weather_scenarios, WeatherCondition};
