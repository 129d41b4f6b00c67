//! Stochastic 8-neighbor cellular automaton

use super::r#trait::{SpreadModel, StepReport};
use super::SpreadParams;
use crate::core_types::{CellState, WeatherCondition};
use crate::grid::{neighbors, FireState, TerrainGrid};
use crate::physics::{burn_step, combine_probabilities, SpreadConditions};
use rand::{Rng, RngCore};

/// Cellular spread with per-neighbor independent ignition trials
///
/// Each step:
/// 1. Burning cells consume fuel; exhausted cells become `Burnt`.
/// 2. Every vegetation cell with burning neighbors ignites on one Bernoulli
///    draw against `1 - Π(1 - p_i)`.
///
/// Both phases read the previous step through the ping-pong buffer of
/// [`FireState`], so the result does not depend on visiting order. The random
/// draws do, which is why cells are always visited row-major.
#[derive(Debug, Clone, Default)]
pub struct CellularSpreadModel {
    params: SpreadParams,
}

impl CellularSpreadModel {
    pub fn new(params: SpreadParams) -> Self {
        CellularSpreadModel { params }
    }

    /// Coefficients in use
    pub fn params(&self) -> &SpreadParams {
        &self.params
    }
}

impl SpreadModel for CellularSpreadModel {
    fn step(
        &self,
        terrain: &TerrainGrid,
        state: &mut FireState,
        weather: &WeatherCondition,
        rng: &mut dyn RngCore,
        step_index: u32,
    ) -> StepReport {
        let mut report = StepReport::default();
        if state.burning_count() == 0 {
            return report;
        }

        let weather = weather.clamped();
        let conditions = SpreadConditions::new(&self.params, &weather);
        let (width, height) = (state.width(), state.height());
        let cell_size = terrain.cell_size();

        let (prev, next) = state.begin_step();
        for (i, cell) in prev.iter().enumerate() {
            match cell.state {
                CellState::Burning => {
                    let burn = burn_step(
                        &self.params,
                        terrain.vegetation_at(i),
                        cell.fuel_remaining,
                        cell.burn_intensity,
                    );
                    let out = &mut next[i];
                    if burn.is_burnt_out() {
                        out.state = CellState::Burnt;
                        out.fuel_remaining = 0.0;
                        out.burn_intensity = 0.0;
                        report.burnt_out += 1;
                    } else {
                        out.fuel_remaining = burn.fuel_remaining;
                        out.burn_intensity = burn.intensity;
                        report.burning += 1;
                    }
                }
                CellState::Vegetation => {
                    let (x, y) = (i % width, i / width);
                    let target_elevation = terrain.elevation_at(i);
                    let vegetation = terrain.vegetation_at(i);

                    let mut sources = neighbors(x, y, width, height)
                        .filter(|&(n, _)| prev[n].state == CellState::Burning)
                        .peekable();
                    if sources.peek().is_none() {
                        continue;
                    }

                    let p = combine_probabilities(sources.map(|(n, offset)| {
                        // `offset` points at the source; spread runs the other way
                        let spread = offset.reversed();
                        conditions.probability(
                            &self.params,
                            vegetation,
                            spread,
                            target_elevation - terrain.elevation_at(n),
                            cell_size * spread.distance(),
                        )
                    }));

                    if p > 0.0 && rng.random::<f64>() < p {
                        let out = &mut next[i];
                        out.state = CellState::Burning;
                        out.ignition_step = Some(step_index);
                        report.ignited += 1;
                        report.burning += 1;
                    }
                }
                CellState::Empty | CellState::Burnt => {}
            }
        }
        state.commit_step();

        report
    }

    fn name(&self) -> &'static str {
        "cellular"
    }
}
