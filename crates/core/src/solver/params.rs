//! Tunable spread and combustion coefficients

use crate::error::{FireRiskError, Result};
use serde::{Deserialize, Serialize};

/// Coefficients of the cellular spread model
///
/// Defaults are calibrated for a 30 m grid and a timestep of roughly one
/// minute of fire behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadParams {
    /// Per-neighbor ignition probability under neutral conditions
    pub base_spread_probability: f64,

    /// Wind alignment gain `k` in `1 + k·(v/10)·max(0, cos θ)`
    pub wind_coefficient: f64,

    /// Humidity factor is `humidity_offset - H/100`
    pub humidity_offset: f64,

    /// Fuel moisture decay rate (per % moisture)
    pub fuel_moisture_decay: f64,

    /// Temperature factor is `temperature_base + T / temperature_scale`
    pub temperature_base: f64,
    /// Degrees per unit of temperature factor
    pub temperature_scale: f64,

    /// Recent rainfall decay rate (per mm)
    pub rainfall_decay: f64,

    /// Gain on the rise/run ratio between source and target cell
    pub slope_coefficient: f64,

    /// How strongly a hot fire accelerates its own fuel consumption
    pub intensity_coupling: f64,
    /// Intensity (kW/m) at which the acceleration reaches half its maximum
    pub intensity_half_saturation: f64,

    /// Fireline intensity (kW/m) released per t/ha consumed in one step
    pub heat_yield: f64,
}

impl Default for SpreadParams {
    fn default() -> Self {
        SpreadParams {
            base_spread_probability: 0.35,
            wind_coefficient: 1.0,
            humidity_offset: 1.15,
            fuel_moisture_decay: 0.05,
            temperature_base: 0.85,
            temperature_scale: 120.0,
            rainfall_decay: 0.1,
            slope_coefficient: 2.0,
            intensity_coupling: 0.5,
            intensity_half_saturation: 1000.0,
            heat_yield: 300.0,
        }
    }
}

impl SpreadParams {
    /// Reject coefficients that would make probabilities or burn rates
    /// meaningless (negative, non-finite, or a zero divisor)
    ///
    /// # Errors
    ///
    /// [`FireRiskError::InvalidParameter`] naming the first bad coefficient.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("base_spread_probability", self.base_spread_probability),
            ("wind_coefficient", self.wind_coefficient),
            ("humidity_offset", self.humidity_offset),
            ("fuel_moisture_decay", self.fuel_moisture_decay),
            ("temperature_base", self.temperature_base),
            ("rainfall_decay", self.rainfall_decay),
            ("slope_coefficient", self.slope_coefficient),
            ("intensity_coupling", self.intensity_coupling),
            ("heat_yield", self.heat_yield),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FireRiskError::invalid_parameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("temperature_scale", self.temperature_scale),
            ("intensity_half_saturation", self.intensity_half_saturation),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FireRiskError::invalid_parameter(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        if self.base_spread_probability > 1.0 {
            return Err(FireRiskError::invalid_parameter(format!(
                "base_spread_probability must be at most 1, got {}",
                self.base_spread_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SpreadParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_coefficients() {
        let params = SpreadParams {
            base_spread_probability: 1.5,
            ..SpreadParams::default()
        };
        assert!(params.validate().is_err());

        let params = SpreadParams {
            intensity_half_saturation: 0.0,
            ..SpreadParams::default()
        };
        assert!(params.validate().is_err());

        let params = SpreadParams {
            wind_coefficient: f64::NAN,
            ..SpreadParams::default()
        };
        assert!(params.validate().is_err());
    }
}
