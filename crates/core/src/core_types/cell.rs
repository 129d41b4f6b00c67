//! Per-cell fire state and vegetation classes

use serde::{Deserialize, Serialize};

/// Fire state of a single grid cell
///
/// Transitions are one-way: `Vegetation -> Burning -> Burnt`. `Empty` cells
/// (bare ground, water, fuel below the vegetation threshold) never change.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// No burnable fuel
    #[default]
    Empty = 0,
    /// Unburned fuel
    Vegetation = 1,
    /// Actively burning
    Burning = 2,
    /// Fuel exhausted
    Burnt = 3,
}

impl CellState {
    /// Stable numeric code used by grid exports and the C ABI
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether moving from `self` to `next` respects the one-way lifecycle
    pub const fn can_transition_to(self, next: CellState) -> bool {
        matches!(
            (self, next),
            (CellState::Vegetation, CellState::Burning) | (CellState::Burning, CellState::Burnt)
        )
    }
}

/// Vegetation class driving flammability and burn-out speed
///
/// Codes match the terrain input convention: 0 = sparse .. 3 = extreme.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VegetationClass {
    /// Open grassland, scattered shrubs
    Sparse = 0,
    /// Open forest / woodland
    #[default]
    Moderate = 1,
    /// Dense forest with ladder fuels
    Dense = 2,
    /// Heavy, oil-rich scrub (mallee, heath)
    Extreme = 3,
}

impl VegetationClass {
    /// Relative flammability multiplier applied to ignition probability
    pub const fn flammability(self) -> f64 {
        match self {
            VegetationClass::Sparse => 0.6,
            VegetationClass::Moderate => 1.0,
            VegetationClass::Dense => 1.3,
            VegetationClass::Extreme => 1.6,
        }
    }

    /// Weight of the class in the deterministic screening surface
    pub const fn screening_factor(self) -> f64 {
        match self {
            VegetationClass::Sparse => 0.3,
            VegetationClass::Moderate => 0.6,
            VegetationClass::Dense => 0.9,
            VegetationClass::Extreme => 1.0,
        }
    }

    /// Baseline fuel consumption per timestep (t/ha) for a freshly burning cell
    ///
    /// Heavier fuel complexes burn longer, so their baseline is lower.
    pub const fn base_consumption_rate(self) -> f64 {
        match self {
            VegetationClass::Sparse => 4.0,
            VegetationClass::Moderate => 3.0,
            VegetationClass::Dense => 2.5,
            VegetationClass::Extreme => 2.0,
        }
    }
}

impl TryFrom<u8> for VegetationClass {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(VegetationClass::Sparse),
            1 => Ok(VegetationClass::Moderate),
            2 => Ok(VegetationClass::Dense),
            3 => Ok(VegetationClass::Extreme),
            other => Err(other),
        }
    }
}

/// Mutable fire state of one cell
///
/// Position is implied by the cell's row-major index in its grid; static
/// attributes (elevation, fuel load, vegetation) live in
/// [`crate::grid::TerrainGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) state: CellState,
    /// Fuel left to burn (t/ha), always within `[0, fuel_load]`
    pub(crate) fuel_remaining: f64,
    /// Fireline intensity from the most recent step (kW/m)
    pub(crate) burn_intensity: f64,
    /// Step index at which the cell ignited
    pub(crate) ignition_step: Option<u32>,
}

impl Cell {
    /// Unburnable cell
    pub const EMPTY: Cell = Cell {
        state: CellState::Empty,
        fuel_remaining: 0.0,
        burn_intensity: 0.0,
        ignition_step: None,
    };

    /// Unburned vegetation carrying `fuel_load` t/ha
    pub fn vegetation(fuel_load: f64) -> Self {
        Cell {
            state: CellState::Vegetation,
            fuel_remaining: fuel_load,
            burn_intensity: 0.0,
            ignition_step: None,
        }
    }

    /// Current fire state
    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Fuel remaining (t/ha)
    #[inline]
    pub fn fuel_remaining(&self) -> f64 {
        self.fuel_remaining
    }

    /// Fireline intensity (kW/m)
    #[inline]
    pub fn burn_intensity(&self) -> f64 {
        self.burn_intensity
    }

    /// Step at which the cell caught fire, if it has
    #[inline]
    pub fn ignition_step(&self) -> Option<u32> {
        self.ignition_step
    }

    /// Is the cell currently burning
    #[inline]
    pub fn is_burning(&self) -> bool {
        self.state == CellState::Burning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_is_one_way() {
        assert!(CellState::Vegetation.can_transition_to(CellState::Burning));
        assert!(CellState::Burning.can_transition_to(CellState::Burnt));

        assert!(!CellState::Burnt.can_transition_to(CellState::Burning));
        assert!(!CellState::Burning.can_transition_to(CellState::Vegetation));
        assert!(!CellState::Empty.can_transition_to(CellState::Burning));
        assert!(!CellState::Vegetation.can_transition_to(CellState::Burnt));
    }

    #[test]
    fn test_vegetation_codes_round_trip() {
        for code in 0u8..4 {
            let class = VegetationClass::try_from(code).unwrap();
            assert_eq!(class as u8, code);
        }
        assert_eq!(VegetationClass::try_from(7), Err(7));
    }

    #[test]
    fn test_flammability_ordering() {
        assert!(VegetationClass::Sparse.flammability() < VegetationClass::Moderate.flammability());
        assert!(VegetationClass::Moderate.flammability() < VegetationClass::Dense.flammability());
        assert!(VegetationClass::Dense.flammability() < VegetationClass::Extreme.flammability());
    }
}
