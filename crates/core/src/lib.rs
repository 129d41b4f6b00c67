//! Bushfire Risk Core Library
//!
//! Stochastic bushfire spread on a 2D landscape grid, and a Monte Carlo
//! ensemble that turns many spread runs into a per-cell probability of
//! burning.
//!
//! ## Layout
//!
//! - [`grid`] - immutable [`TerrainGrid`] shared by every run, and the mutable
//!   per-run [`FireState`]
//! - [`physics`] - per-cell ignition probability and fuel consumption
//! - [`solver`] - the [`SpreadModel`] trait and its cellular automaton
//! - [`simulation`] - the single-run [`FireSimulation`] state machine and the
//!   [`MonteCarloEngine`]
//! - [`core_types`] - cells, weather, and the `McArthur` fire danger indices
//!
//! ## Example
//!
//! ```rust,ignore
//! use bushfire_risk_core::{EnsembleConfig, MonteCarloEngine, TerrainGrid, VegetationClass,
//!     WeatherCondition};
//! use std::sync::Arc;
//!
//! let terrain = Arc::new(TerrainGrid::uniform(50, 50, 12.0, VegetationClass::Dense)?);
//! let engine = MonteCarloEngine::new(terrain, EnsembleConfig::default());
//! let assessment = engine.assess_risk(&[WeatherCondition::catastrophic()], &[(25, 25)], 500)?;
//! println!("{:.1} ha at risk", assessment.area_at_risk_ha);
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod core_types;
pub mod error;
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{
    classify_rating, compute_fdi, drought_factor_from_rainfall, generate_weather_scenarios,
    grassland_fdi, Cell, CellState, FireDangerRating, VegetationClass, WeatherCondition,
};
pub use error::{FireRiskError, Result};
pub use grid::{FireState, StateCounts, TerrainConfig, TerrainGrid};
pub use simulation::{
    screening_risk_surface, EnsembleConfig, FireSimulation, MonteCarloEngine, RiskAssessment,
    RiskSurface, RunOutcome, SamplingStrategy, SimulationPhase, SimulationStats, Weighting,
};
pub use solver::{CellularSpreadModel, SpreadModel, SpreadParams, StepReport};
