//! Single-run fire simulation and the Monte Carlo ensemble built on it
//!
//! [`FireSimulation`] is a small state machine:
//!
//! ```text
//! Idle --ignite--> Active --(no cells burning)--> Extinguished
//! ```
//!
//! `Extinguished` is terminal. Stepping never stops on its own; callers decide
//! how many steps to take.

pub mod monte_carlo;
pub mod sampling;
pub mod screening;

pub use monte_carlo::{EnsembleConfig, MonteCarloEngine, RiskAssessment, RiskSurface, RunOutcome};
pub use sampling::{run_rng, SamplingStrategy, Weighting};
pub use screening::screening_risk_surface;

use crate::core_types::{CellState, WeatherCondition};
use crate::grid::{FireState, StateCounts, TerrainGrid};
use crate::solver::{CellularSpreadModel, SpreadModel, StepReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulationPhase {
    /// Nothing has been ignited yet
    #[default]
    Idle,
    /// At least one cell is burning
    Active,
    /// Fire has gone out; further ignitions and steps are ignored
    Extinguished,
}

/// Aggregate statistics for the current step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Steps taken so far
    pub step: u32,
    pub phase: SimulationPhase,
    /// Cell counts per state
    pub counts: StateCounts,
    /// Burnt area (ha)
    pub burned_area_ha: f64,
    /// Highest fireline intensity (kW/m)
    pub max_intensity: f64,
    /// Cells currently burning
    pub active_fire_count: usize,
    /// Burning cells touching unburned vegetation
    pub perimeter_count: usize,
}

/// One fire run over a shared terrain
pub struct FireSimulation {
    terrain: Arc<TerrainGrid>,
    state: FireState,
    model: Arc<dyn SpreadModel>,
    rng: ChaCha8Rng,
    step: u32,
    phase: SimulationPhase,
}

impl FireSimulation {
    /// Create a run with the default cellular model and a seeded RNG
    #[must_use]
    pub fn new(terrain: Arc<TerrainGrid>, seed: u64) -> Self {
        Self::with_model(
            terrain,
            Arc::new(CellularSpreadModel::default()),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    /// Create a run with an explicit model and random source
    #[must_use]
    pub fn with_model(
        terrain: Arc<TerrainGrid>,
        model: Arc<dyn SpreadModel>,
        rng: ChaCha8Rng,
    ) -> Self {
        let state = FireState::from_terrain(&terrain);
        FireSimulation {
            terrain,
            state,
            model,
            rng,
            step: 0,
            phase: SimulationPhase::Idle,
        }
    }

    /// Set the vegetation cell at `(x, y)` burning.
    ///
    /// Returns `false` without changing anything if the cell is outside the
    /// grid, not vegetation, or the run is already extinguished.
    pub fn ignite(&mut self, x: usize, y: usize) -> bool {
        if self.phase == SimulationPhase::Extinguished {
            debug!("Ignition at ({}, {}) ignored: run extinguished", x, y);
            return false;
        }
        let Some(index) = self.terrain.index(x, y) else {
            debug!("Ignition at ({}, {}) ignored: outside grid", x, y);
            return false;
        };
        if !self.state.ignite(index, self.step) {
            debug!(
                "Ignition at ({}, {}) ignored: cell is {:?}",
                x,
                y,
                self.state.cells()[index].state()
            );
            return false;
        }

        self.phase = SimulationPhase::Active;
        true
    }

    /// Advance one timestep under `weather`.
    ///
    /// With nothing burning this is a no-op: no state changes, no random
    /// draws, and the step counter stays put.
    pub fn step(&mut self, weather: &WeatherCondition) -> StepReport {
        if self.phase != SimulationPhase::Active {
            return StepReport::default();
        }

        let report = self.model.step(
            &self.terrain,
            &mut self.state,
            weather,
            &mut self.rng,
            self.step + 1,
        );
        self.step += 1;

        if report.burning == 0 {
            debug!("Fire extinguished after {} steps", self.step);
            self.phase = SimulationPhase::Extinguished;
        }
        report
    }

    /// Step until extinguished or `max_steps` further steps have been taken.
    /// Returns whether the fire went out.
    pub fn run_until_extinguished(&mut self, weather: &WeatherCondition, max_steps: u32) -> bool {
        for _ in 0..max_steps {
            if self.phase != SimulationPhase::Active {
                break;
            }
            self.step(weather);
        }
        self.phase != SimulationPhase::Active
    }

    /// Take exactly `steps` steps and return the state grid before the first
    /// step and after each one (`steps + 1` frames).
    ///
    /// Steps after extinction are no-ops, so trailing frames repeat.
    pub fn run_recorded(&mut self, weather: &WeatherCondition, steps: u32) -> Vec<Vec<CellState>> {
        let mut frames = Vec::with_capacity(steps as usize + 1);
        frames.push(self.state_grid());
        for _ in 0..steps {
            self.step(weather);
            frames.push(self.state_grid());
        }
        frames
    }

    #[inline]
    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// Steps taken so far
    #[inline]
    pub fn step_count(&self) -> u32 {
        self.step
    }

    #[inline]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Read-only view of the per-cell state
    #[inline]
    pub fn state(&self) -> &FireState {
        &self.state
    }

    pub(crate) fn into_state(self) -> FireState {
        self.state
    }

    /// Burnt cell count times cell area (ha)
    pub fn burned_area(&self) -> f64 {
        self.state.counts().burnt as f64 * self.terrain.cell_area_hectares()
    }

    pub fn max_intensity(&self) -> f64 {
        self.state.max_intensity()
    }

    pub fn active_fire_count(&self) -> usize {
        self.state.burning_count()
    }

    pub fn perimeter_count(&self) -> usize {
        self.state.perimeter_count()
    }

    pub fn counts(&self) -> StateCounts {
        self.state.counts()
    }

    pub fn state_grid(&self) -> Vec<CellState> {
        self.state.state_grid()
    }

    pub fn intensity_grid(&self) -> Vec<f64> {
        self.state.intensity_grid()
    }

    pub fn fuel_remaining_grid(&self) -> Vec<f64> {
        self.state.fuel_remaining_grid()
    }

    /// All aggregate statistics in one pass over the query API
    pub fn stats(&self) -> SimulationStats {
        let counts = self.state.counts();
        SimulationStats {
            step: self.step,
            phase: self.phase,
            counts,
            burned_area_ha: counts.burnt as f64 * self.terrain.cell_area_hectares(),
            max_intensity: self.state.max_intensity(),
            active_fire_count: counts.burning,
            perimeter_count: self.state.perimeter_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::VegetationClass;

    fn simulation(size: usize, seed: u64) -> FireSimulation {
        let terrain = TerrainGrid::uniform(size, size, 10.0, VegetationClass::Moderate).unwrap();
        FireSimulation::new(Arc::new(terrain), seed)
    }

    #[test]
    fn test_phases() {
        let mut sim = simulation(5, 1);
        assert_eq!(sim.phase(), SimulationPhase::Idle);

        assert!(sim.ignite(2, 2));
        assert_eq!(sim.phase(), SimulationPhase::Active);

        let weather = WeatherCondition::new(30.0, 30.0, 20.0, 0.0);
        assert!(sim.run_until_extinguished(&weather, 500));
        assert_eq!(sim.phase(), SimulationPhase::Extinguished);
        assert_eq!(sim.active_fire_count(), 0);

        // Terminal
        assert!(!sim.ignite(0, 0));
        assert_eq!(sim.phase(), SimulationPhase::Extinguished);
    }

    #[test]
    fn test_idle_step_is_noop() {
        let mut sim = simulation(4, 2);
        let before = sim.state_grid();
        let report = sim.step(&WeatherCondition::catastrophic());
        assert_eq!(report, StepReport::default());
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.state_grid(), before);
    }

    #[test]
    fn test_ignite_rejects_out_of_grid_and_repeat() {
        let mut sim = simulation(4, 3);
        assert!(!sim.ignite(4, 0));
        assert!(!sim.ignite(0, 99));
        assert_eq!(sim.phase(), SimulationPhase::Idle);

        assert!(sim.ignite(0, 0));
        assert!(!sim.ignite(0, 0));
        assert_eq!(sim.active_fire_count(), 1);
    }

    #[test]
    fn test_ignition_step_recorded() {
        let mut sim = simulation(6, 4);
        assert!(sim.ignite(1, 1));
        let weather = WeatherCondition::new(30.0, 30.0, 20.0, 0.0);
        sim.step(&weather);
        sim.step(&weather);

        // Two steps cannot carry fire four cells away
        assert!(sim.ignite(5, 5));
        assert_eq!(sim.state().cell(1, 1).unwrap().ignition_step(), Some(0));
        assert_eq!(sim.state().cell(5, 5).unwrap().ignition_step(), Some(2));
    }

    #[test]
    fn test_run_recorded_keeps_every_frame() {
        let mut sim = simulation(10, 6);
        assert!(sim.ignite(2, 2));
        assert!(sim.ignite(7, 7));
        let weather = WeatherCondition::new(35.0, 20.0, 25.0, 45.0);

        let frames = sim.run_recorded(&weather, 8);
        assert_eq!(frames.len(), 9);
        assert_eq!(sim.step_count(), 8);

        let count = |frame: &[CellState], state: CellState| {
            frame.iter().filter(|&&s| s == state).count()
        };
        assert_eq!(count(&frames[0], CellState::Burning), 2);
        assert_eq!(count(&frames[0], CellState::Burnt), 0);
        for pair in frames.windows(2) {
            assert_eq!(pair[0].len(), 100);
            assert!(count(&pair[1], CellState::Burnt) >= count(&pair[0], CellState::Burnt));
        }
        assert_eq!(frames.last(), Some(&sim.state_grid()));
    }

    #[test]
    fn test_run_recorded_repeats_after_extinction() {
        let mut sim = simulation(3, 7);
        assert!(sim.ignite(1, 1));
        assert!(sim.run_until_extinguished(&WeatherCondition::catastrophic(), 500));
        let taken = sim.step_count();

        let frames = sim.run_recorded(&WeatherCondition::catastrophic(), 3);
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(|f| f == &frames[0]));
        assert_eq!(sim.step_count(), taken);
    }

    #[test]
    fn test_stats_consistent_with_queries() {
        let mut sim = simulation(8, 5);
        sim.ignite(4, 4);
        let weather = WeatherCondition::new(35.0, 20.0, 30.0, 90.0);
        for _ in 0..6 {
            sim.step(&weather);
        }

        let stats = sim.stats();
        assert_eq!(stats.counts.total(), 64);
        assert_eq!(stats.active_fire_count, sim.active_fire_count());
        assert_eq!(stats.perimeter_count, sim.perimeter_count());
        assert_eq!(stats.burned_area_ha, sim.burned_area());
        assert_eq!(stats.step, sim.step_count());
        assert!(stats.perimeter_count <= stats.active_fire_count);
    }
}
