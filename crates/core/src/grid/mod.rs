//! Grid-based landscape and fire state
//!
//! [`TerrainGrid`] holds what never changes during a run; [`FireState`] holds
//! what does. Both are row-major with `index = y * width + x`.

pub mod fire_state;
pub mod terrain;

pub use fire_state::{FireState, StateCounts};
pub use terrain::{TerrainConfig, TerrainGrid, SQ_M_PER_HECTARE};

use nalgebra::Vector2;
use std::f64::consts::SQRT_2;

/// Offset from a cell to one of its 8 neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborOffset {
    /// Column delta (+ is east)
    pub dx: isize,
    /// Row delta (+ is south)
    pub dy: isize,
}

impl NeighborOffset {
    /// Center-to-center distance in cell units
    #[inline]
    pub fn distance(self) -> f64 {
        if self.dx != 0 && self.dy != 0 {
            SQRT_2
        } else {
            1.0
        }
    }

    /// The same step taken the other way
    #[inline]
    pub fn reversed(self) -> Self {
        NeighborOffset {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    /// Unit vector pointing along the offset
    #[inline]
    pub fn direction(self) -> Vector2<f64> {
        Vector2::new(self.dx as f64, self.dy as f64) / self.distance()
    }
}

/// The Moore neighborhood, row by row
pub const NEIGHBOR_OFFSETS: [NeighborOffset; 8] = [
    NeighborOffset { dx: -1, dy: -1 },
    NeighborOffset { dx: 0, dy: -1 },
    NeighborOffset { dx: 1, dy: -1 },
    NeighborOffset { dx: -1, dy: 0 },
    NeighborOffset { dx: 1, dy: 0 },
    NeighborOffset { dx: -1, dy: 1 },
    NeighborOffset { dx: 0, dy: 1 },
    NeighborOffset { dx: 1, dy: 1 },
];

/// In-grid neighbors of `(x, y)` as `(index, offset from (x, y))`.
///
/// Positions outside the grid are skipped; there is no wraparound.
pub fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, NeighborOffset)> {
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |offset| {
        let nx = x.checked_add_signed(offset.dx)?;
        let ny = y.checked_add_signed(offset.dy)?;
        (nx < width && ny < height).then_some((ny * width + nx, offset))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corner_has_three_neighbors() {
        let found: Vec<usize> = neighbors(0, 0, 5, 5).map(|(i, _)| i).collect();
        assert_eq!(found, vec![1, 5, 6]);

        let found: Vec<usize> = neighbors(4, 4, 5, 5).map(|(i, _)| i).collect();
        assert_eq!(found, vec![18, 19, 23]);
    }

    #[test]
    fn test_interior_has_eight_neighbors() {
        assert_eq!(neighbors(2, 2, 5, 5).count(), 8);
        assert_eq!(neighbors(0, 2, 5, 5).count(), 5);
        assert_eq!(neighbors(0, 0, 1, 1).count(), 0);
    }

    #[test]
    fn test_offset_geometry() {
        let diagonal = NeighborOffset { dx: 1, dy: 1 };
        assert_relative_eq!(diagonal.distance(), SQRT_2);
        assert_relative_eq!(diagonal.direction().norm(), 1.0, epsilon = 1e-12);

        let east = NeighborOffset { dx: 1, dy: 0 };
        assert_eq!(east.direction(), Vector2::new(1.0, 0.0));
    }
}
