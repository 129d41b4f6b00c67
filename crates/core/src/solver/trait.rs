//! Spread model trait definition
//!
//! A [`SpreadModel`] advances a [`FireState`] by exactly one synchronous
//! timestep. Models are stateless with respect to any single run: all mutable
//! data lives in the `FireState` and the caller's random source, so one model
//! instance can serve every run of an ensemble concurrently.

use crate::core_types::WeatherCondition;
use crate::grid::{FireState, TerrainGrid};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// What changed during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Vegetation cells that caught fire
    pub ignited: usize,
    /// Burning cells that ran out of fuel
    pub burnt_out: usize,
    /// Cells burning after the step
    pub burning: usize,
}

/// Backend-agnostic interface for one-step fire spread
pub trait SpreadModel: Send + Sync {
    /// Apply one timestep grid-wide.
    ///
    /// Every cell reads only the state before the step. All random draws come
    /// from `rng`, in row-major cell order, so a seeded source reproduces the
    /// step exactly.
    ///
    /// # Arguments
    ///
    /// * `terrain` - Static landscape the state was built from
    /// * `state` - Fire state to advance in place
    /// * `weather` - Conditions for this step; out-of-range fields are clamped
    /// * `rng` - Random source for ignition draws
    /// * `step_index` - Index recorded on cells ignited by this step
    fn step(
        &self,
        terrain: &TerrainGrid,
        state: &mut FireState,
        weather: &WeatherCondition,
        rng: &mut dyn RngCore,
        step_index: u32,
    ) -> StepReport;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}
