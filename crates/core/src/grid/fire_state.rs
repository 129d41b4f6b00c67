//! Mutable per-run fire state
//!
//! Each simulation run owns exactly one [`FireState`], built fresh from the
//! shared terrain. Updates go through a ping-pong buffer pair: the spread
//! model reads the previous step from `cells` and writes the next step into
//! `back`, then the two are swapped. No cell ever observes a same-step update
//! of another cell.

use super::{neighbors, TerrainGrid};
use crate::core_types::{Cell, CellState};
use serde::{Deserialize, Serialize};

/// Cell counts per state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    /// Unburnable cells
    pub empty: usize,
    /// Unburned fuel
    pub vegetation: usize,
    /// Actively burning
    pub burning: usize,
    /// Burned out
    pub burnt: usize,
}

impl StateCounts {
    /// Sum over all states; always equals the grid size
    pub fn total(&self) -> usize {
        self.empty + self.vegetation + self.burning + self.burnt
    }
}

/// Per-run cell states, fuel and intensity
#[derive(Debug, Clone)]
pub struct FireState {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    // Scratch buffer for the next step (ping-pong with `cells`)
    back: Vec<Cell>,
}

impl FireState {
    /// Initial state for a terrain: vegetation where fuel exceeds the
    /// threshold, empty elsewhere
    pub fn from_terrain(terrain: &TerrainGrid) -> Self {
        let cells: Vec<Cell> = (0..terrain.len())
            .map(|i| {
                if terrain.is_burnable(i) {
                    Cell::vegetation(terrain.fuel_load_at(i))
                } else {
                    Cell::EMPTY
                }
            })
            .collect();

        FireState {
            width: terrain.width(),
            height: terrain.height(),
            back: cells.clone(),
            cells,
        }
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for states built from a valid terrain
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(x, y)`, or `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[y * self.width + x])
    }

    /// All cells, row-major
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Count cells per state
    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for cell in &self.cells {
            match cell.state {
                CellState::Empty => counts.empty += 1,
                CellState::Vegetation => counts.vegetation += 1,
                CellState::Burning => counts.burning += 1,
                CellState::Burnt => counts.burnt += 1,
            }
        }
        counts
    }

    /// Number of burning cells
    pub fn burning_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_burning()).count()
    }

    /// Highest current intensity (kW/m), 0 when nothing burns
    pub fn max_intensity(&self) -> f64 {
        self.cells
            .iter()
            .map(|c| c.burn_intensity)
            .fold(0.0, f64::max)
    }

    /// Burning cells touching at least one unburned vegetation cell
    pub fn perimeter_count(&self) -> usize {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_burning())
            .filter(|&i| {
                let (x, y) = (i % self.width, i / self.width);
                neighbors(x, y, self.width, self.height)
                    .any(|(n, _)| self.cells[n].state == CellState::Vegetation)
            })
            .count()
    }

    /// State grid, row-major
    pub fn state_grid(&self) -> Vec<CellState> {
        self.cells.iter().map(|c| c.state).collect()
    }

    /// Intensity grid (kW/m), row-major
    pub fn intensity_grid(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.burn_intensity).collect()
    }

    /// Fuel remaining grid (t/ha), row-major
    pub fn fuel_remaining_grid(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.fuel_remaining).collect()
    }

    /// `true` where the cell has burned out
    pub fn burnt_mask(&self) -> Vec<bool> {
        self.cells
            .iter()
            .map(|c| c.state == CellState::Burnt)
            .collect()
    }

    /// Set a vegetation cell burning. Returns whether anything changed.
    pub(crate) fn ignite(&mut self, index: usize, step: u32) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if cell.state == CellState::Vegetation => {
                cell.state = CellState::Burning;
                cell.ignition_step = Some(step);
                true
            }
            _ => false,
        }
    }

    /// Prepare the back buffer as a copy of the current step and hand out
    /// `(previous, next)` views
    pub(crate) fn begin_step(&mut self) -> (&[Cell], &mut [Cell]) {
        self.back.copy_from_slice(&self.cells);
        (self.cells.as_slice(), self.back.as_mut_slice())
    }

    /// Publish the back buffer as the current step
    pub(crate) fn commit_step(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.back);
    }
}
