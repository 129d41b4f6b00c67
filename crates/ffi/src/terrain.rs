//! FFI-exposed terrain and weather input types.

use crate::error::DefaultBushfireError;
use crate::helpers::slice_from_raw;
use bushfire_risk_core::{TerrainConfig, TerrainGrid, WeatherCondition};

/// Terrain description passed by value from C.
///
/// The three arrays are row-major with `width * height` entries each. They are
/// read and copied during the call; the caller may free them afterwards.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireTerrain {
    /// Columns in the grid.
    pub width: usize,
    /// Rows in the grid.
    pub height: usize,
    /// Elevation per cell (m).
    pub elevation: *const f64,
    /// Fuel load per cell (t/ha).
    pub fuel_load: *const f64,
    /// Vegetation class per cell: 0 sparse, 1 moderate, 2 dense, 3 extreme.
    pub vegetation: *const u8,
    /// Cell edge length (m). Zero or negative selects the default of 30 m.
    pub cell_size_m: f64,
    /// Fuel load (t/ha) at or below which a cell is bare. Negative selects the default.
    pub fuel_threshold: f64,
}

impl BushfireTerrain {
    /// Copy the caller's arrays into a validated terrain grid.
    ///
    /// # Safety
    ///
    /// Each non-null array pointer must reference `width * height` values.
    pub(crate) unsafe fn to_grid(&self) -> Result<TerrainGrid, DefaultBushfireError> {
        let len = self.width.checked_mul(self.height).ok_or_else(|| {
            DefaultBushfireError::invalid_parameter(format!(
                "grid {}x{} overflows",
                self.width, self.height
            ))
        })?;

        let elevation = unsafe { slice_from_raw(self.elevation, len, "elevation")? };
        let fuel_load = unsafe { slice_from_raw(self.fuel_load, len, "fuel_load")? };
        let vegetation = unsafe { slice_from_raw(self.vegetation, len, "vegetation")? };

        let defaults = TerrainConfig::default();
        let config = TerrainConfig {
            cell_size_m: if self.cell_size_m > 0.0 {
                self.cell_size_m
            } else {
                defaults.cell_size_m
            },
            fuel_threshold: if self.fuel_threshold >= 0.0 {
                self.fuel_threshold
            } else {
                defaults.fuel_threshold
            },
        };

        Ok(TerrainGrid::from_codes(
            self.width,
            self.height,
            elevation.to_vec(),
            fuel_load.to_vec(),
            vegetation,
            config,
        )?)
    }
}

/// Weather for one step or one ensemble scenario.
///
/// `wind_direction` is the bearing the wind blows toward (0 = north, 90 = east).
/// Out-of-range values are clamped, never rejected.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireWeather {
    /// Air temperature (°C).
    pub temperature: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Wind speed (km/h).
    pub wind_speed: f64,
    /// Wind heading (degrees).
    pub wind_direction: f64,
    /// Rainfall over the last 24 h (mm).
    pub rainfall: f64,
    /// Dead fuel moisture (%).
    pub fuel_moisture: f64,
}

impl From<BushfireWeather> for WeatherCondition {
    fn from(w: BushfireWeather) -> Self {
        WeatherCondition {
            temperature: w.temperature,
            humidity: w.humidity,
            wind_speed: w.wind_speed,
            wind_direction: w.wind_direction,
            rainfall: w.rainfall,
            fuel_moisture: w.fuel_moisture,
        }
    }
}
