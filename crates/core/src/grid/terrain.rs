//! Static landscape attributes shared by every simulation run
//!
//! A [`TerrainGrid`] is built once from caller-supplied elevation, fuel load
//! and vegetation arrays and is never mutated afterwards. Monte Carlo runs hold
//! it behind an `Arc` and read it concurrently without locking.

use super::neighbors;
use crate::core_types::VegetationClass;
use crate::error::{FireRiskError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Square metres per hectare
pub const SQ_M_PER_HECTARE: f64 = 10_000.0;

/// Terrain construction settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Edge length of one square cell (m)
    pub cell_size_m: f64,
    /// Cells with `fuel_load <= fuel_threshold` (t/ha) start as `Empty`
    pub fuel_threshold: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            cell_size_m: 30.0,
            fuel_threshold: 0.5,
        }
    }
}

/// Immutable per-cell terrain attributes, row-major (`index = y * width + x`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    config: TerrainConfig,
    /// Elevation (m)
    elevation: Vec<f64>,
    /// Fuel load (t/ha)
    fuel_load: Vec<f64>,
    vegetation: Vec<VegetationClass>,
    /// Precomputed steepest slope to any neighbor (degrees)
    slope: Vec<f64>,
}

impl TerrainGrid {
    /// Build a terrain grid from three equally shaped arrays.
    ///
    /// # Errors
    ///
    /// - [`FireRiskError::EmptyGrid`] if `width` or `height` is zero
    /// - [`FireRiskError::DataShape`] if any array length differs from
    ///   `width * height`
    /// - [`FireRiskError::InvalidParameter`] if `width * height` overflows,
    ///   `config.cell_size_m` is not a positive finite number, or
    ///   `config.fuel_threshold` is negative/non-finite
    ///
    /// Non-finite elevations and non-finite or negative fuel loads are replaced
    /// by zero and reported with a warning.
    pub fn from_arrays(
        width: usize,
        height: usize,
        mut elevation: Vec<f64>,
        mut fuel_load: Vec<f64>,
        vegetation: Vec<VegetationClass>,
        config: TerrainConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FireRiskError::EmptyGrid { width, height });
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            FireRiskError::invalid_parameter(format!("grid {width}x{height} overflows"))
        })?;
        for (field, actual) in [
            ("elevation", elevation.len()),
            ("fuel_load", fuel_load.len()),
            ("vegetation", vegetation.len()),
        ] {
            if actual != expected {
                return Err(FireRiskError::DataShape {
                    field,
                    expected,
                    actual,
                });
            }
        }

        if !(config.cell_size_m.is_finite() && config.cell_size_m > 0.0) {
            return Err(FireRiskError::invalid_parameter(format!(
                "cell_size_m must be finite and positive, got {}",
                config.cell_size_m
            )));
        }
        if !(config.fuel_threshold.is_finite() && config.fuel_threshold >= 0.0) {
            return Err(FireRiskError::invalid_parameter(format!(
                "fuel_threshold must be finite and non-negative, got {}",
                config.fuel_threshold
            )));
        }

        let mut repaired = 0usize;
        for z in &mut elevation {
            if !z.is_finite() {
                *z = 0.0;
                repaired += 1;
            }
        }
        for load in &mut fuel_load {
            if !load.is_finite() || *load < 0.0 {
                *load = 0.0;
                repaired += 1;
            }
        }
        if repaired > 0 {
            warn!("Terrain input contained {repaired} invalid elevation/fuel values, replaced with 0");
        }

        let slope = compute_slopes(width, height, config.cell_size_m, &elevation);

        Ok(TerrainGrid {
            width,
            height,
            config,
            elevation,
            fuel_load,
            vegetation,
            slope,
        })
    }

    /// Build from raw vegetation codes (0 = sparse .. 3 = extreme)
    ///
    /// # Errors
    ///
    /// Same as [`TerrainGrid::from_arrays`], plus
    /// [`FireRiskError::InvalidParameter`] for an unknown vegetation code.
    pub fn from_codes(
        width: usize,
        height: usize,
        elevation: Vec<f64>,
        fuel_load: Vec<f64>,
        vegetation_codes: &[u8],
        config: TerrainConfig,
    ) -> Result<Self> {
        let vegetation = vegetation_codes
            .iter()
            .map(|&code| {
                VegetationClass::try_from(code).map_err(|bad| {
                    FireRiskError::invalid_parameter(format!("unknown vegetation code {bad}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_arrays(width, height, elevation, fuel_load, vegetation, config)
    }

    /// Flat terrain with the same fuel load and vegetation everywhere
    ///
    /// # Errors
    ///
    /// [`FireRiskError::EmptyGrid`] if either dimension is zero.
    pub fn uniform(
        width: usize,
        height: usize,
        fuel_load: f64,
        vegetation: VegetationClass,
    ) -> Result<Self> {
        let cells = width.saturating_mul(height);
        Self::from_arrays(
            width,
            height,
            vec![0.0; cells],
            vec![fuel_load; cells],
            vec![vegetation; cells],
            TerrainConfig::default(),
        )
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

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false: construction rejects empty grids
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Construction settings
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Cell edge length (m)
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.config.cell_size_m
    }

    /// Area of one cell (ha)
    #[inline]
    pub fn cell_area_hectares(&self) -> f64 {
        self.config.cell_size_m * self.config.cell_size_m / SQ_M_PER_HECTARE
    }

    /// Row-major index of `(x, y)`, or `None` outside the grid
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// `(x, y)` of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Elevation at a cell index (m)
    #[inline]
    pub fn elevation_at(&self, index: usize) -> f64 {
        self.elevation[index]
    }

    /// Fuel load at a cell index (t/ha)
    #[inline]
    pub fn fuel_load_at(&self, index: usize) -> f64 {
        self.fuel_load[index]
    }

    /// Vegetation class at a cell index
    #[inline]
    pub fn vegetation_at(&self, index: usize) -> VegetationClass {
        self.vegetation[index]
    }

    /// Steepest slope from a cell to any neighbor (degrees)
    #[inline]
    pub fn slope_at(&self, index: usize) -> f64 {
        self.slope[index]
    }

    /// Whether a cell carries enough fuel to start as vegetation
    #[inline]
    pub fn is_burnable(&self, index: usize) -> bool {
        self.fuel_load[index] > self.config.fuel_threshold
    }

    /// Number of cells that start as vegetation
    pub fn burnable_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_burnable(i)).count()
    }

    /// Elevation grid (m)
    pub fn elevations(&self) -> &[f64] {
        &self.elevation
    }

    /// Fuel load grid (t/ha)
    pub fn fuel_loads(&self) -> &[f64] {
        &self.fuel_load
    }

    /// Vegetation grid
    pub fn vegetation(&self) -> &[VegetationClass] {
        &self.vegetation
    }

    /// Slope grid (degrees)
    pub fn slopes(&self) -> &[f64] {
        &self.slope
    }
}

/// Steepest neighbor slope per cell, measured over the true center distance
/// (diagonals are `sqrt(2)` cells away)
fn compute_slopes(width: usize, height: usize, cell_size: f64, elevation: &[f64]) -> Vec<f64> {
    let mut slope = Vec::with_capacity(elevation.len());
    for y in 0..height {
        for x in 0..width {
            let z = elevation[y * width + x];
            let steepest = neighbors(x, y, width, height)
                .map(|(n, offset)| {
                    let run = cell_size * offset.distance();
                    ((elevation[n] - z).abs() / run).atan().to_degrees()
                })
                .fold(0.0_f64, f64::max);
            slope.push(steepest);
        }
    }
    slope
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = TerrainGrid::from_arrays(
            3,
            3,
            vec![0.0; 9],
            vec![10.0; 8],
            vec![VegetationClass::Moderate; 9],
            TerrainConfig::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            FireRiskError::DataShape {
                field: "fuel_load",
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = TerrainGrid::uniform(0, 5, 10.0, VegetationClass::Moderate).unwrap_err();
        assert_eq!(
            err,
            FireRiskError::EmptyGrid {
                width: 0,
                height: 5
            }
        );

        let err = TerrainGrid::uniform(4, 0, 10.0, VegetationClass::Moderate).unwrap_err();
        assert!(err.to_string().contains("4x0"), "{err}");
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let config = TerrainConfig {
            cell_size_m: 0.0,
            ..Default::default()
        };
        let err = TerrainGrid::from_arrays(
            1,
            1,
            vec![0.0],
            vec![1.0],
            vec![VegetationClass::Sparse],
            config,
        )
        .unwrap_err();
        assert!(matches!(err, FireRiskError::InvalidParameter(_)));
    }

    #[test]
    fn test_unknown_vegetation_code_rejected() {
        let err = TerrainGrid::from_codes(
            2,
            1,
            vec![0.0; 2],
            vec![5.0; 2],
            &[1, 9],
            TerrainConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FireRiskError::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_values_sanitized() {
        let terrain = TerrainGrid::from_arrays(
            2,
            1,
            vec![f64::NAN, 10.0],
            vec![-4.0, f64::INFINITY],
            vec![VegetationClass::Moderate; 2],
            TerrainConfig::default(),
        )
        .unwrap();
        assert_eq!(terrain.elevation_at(0), 0.0);
        assert_eq!(terrain.fuel_load_at(0), 0.0);
        assert_eq!(terrain.fuel_load_at(1), 0.0);
        assert_eq!(terrain.burnable_count(), 0);
    }

    #[test]
    fn test_threshold_decides_burnable() {
        let terrain = TerrainGrid::from_arrays(
            3,
            1,
            vec![0.0; 3],
            vec![0.5, 0.51, 12.0],
            vec![VegetationClass::Sparse; 3],
            TerrainConfig::default(),
        )
        .unwrap();
        assert!(!terrain.is_burnable(0), "load equal to threshold is empty");
        assert!(terrain.is_burnable(1));
        assert!(terrain.is_burnable(2));
    }

    #[test]
    fn test_slope_cache() {
        // Single 30 m step between two columns
        let terrain = TerrainGrid::from_arrays(
            2,
            1,
            vec![0.0, 30.0],
            vec![10.0; 2],
            vec![VegetationClass::Moderate; 2],
            TerrainConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(terrain.slope_at(0), 45.0, epsilon = 1e-9);
        assert_relative_eq!(terrain.slope_at(1), 45.0, epsilon = 1e-9);

        let flat = TerrainGrid::uniform(4, 4, 10.0, VegetationClass::Dense).unwrap();
        assert!(flat.slopes().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_index_and_area() {
        let terrain = TerrainGrid::uniform(4, 3, 10.0, VegetationClass::Moderate).unwrap();
        assert_eq!(terrain.index(3, 2), Some(11));
        assert_eq!(terrain.index(4, 0), None);
        assert_eq!(terrain.index(0, 3), None);
        assert_eq!(terrain.coords(11), (3, 2));
        // 30 m cells: 900 m² = 0.09 ha
        assert_relative_eq!(terrain.cell_area_hectares(), 0.09);
    }
}
