//! Fuel consumption and fireline intensity of burning cells

use crate::core_types::VegetationClass;
use crate::solver::SpreadParams;

/// Outcome of burning one cell for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnResult {
    /// Fuel left after this step (t/ha)
    pub fuel_remaining: f64,
    /// Fuel consumed this step (t/ha)
    pub consumed: f64,
    /// Fireline intensity released this step (kW/m)
    pub intensity: f64,
}

impl BurnResult {
    /// Nothing left to burn
    #[inline]
    pub fn is_burnt_out(&self) -> bool {
        self.fuel_remaining <= 0.0
    }
}

/// Fuel consumed per step (t/ha) by a burning cell
///
/// Hot fires burn faster: the vegetation baseline is scaled by
/// `1 + c·I/(I + I_half)`, using the intensity from the previous step.
pub fn consumption_rate(params: &SpreadParams, vegetation: VegetationClass, intensity: f64) -> f64 {
    let intensity = intensity.max(0.0);
    let acceleration = intensity / (intensity + params.intensity_half_saturation);
    vegetation.base_consumption_rate() * (1.0 + params.intensity_coupling * acceleration)
}

/// Burn one step's worth of fuel
pub fn burn_step(
    params: &SpreadParams,
    vegetation: VegetationClass,
    fuel_remaining: f64,
    previous_intensity: f64,
) -> BurnResult {
    let rate = consumption_rate(params, vegetation, previous_intensity);
    let consumed = rate.min(fuel_remaining.max(0.0));
    let remaining = (fuel_remaining - consumed).max(0.0);

    BurnResult {
        fuel_remaining: remaining,
        consumed,
        intensity: consumed * params.heat_yield,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cold_start_uses_baseline_rate() {
        let params = SpreadParams::default();
        for class in [
            VegetationClass::Sparse,
            VegetationClass::Moderate,
            VegetationClass::Dense,
            VegetationClass::Extreme,
        ] {
            assert_relative_eq!(
                consumption_rate(&params, class, 0.0),
                class.base_consumption_rate()
            );
        }
    }

    #[test]
    fn test_rate_grows_with_intensity_but_saturates() {
        let params = SpreadParams::default();
        let class = VegetationClass::Moderate;
        let low = consumption_rate(&params, class, 100.0);
        let high = consumption_rate(&params, class, 5000.0);
        assert!(high > low);
        assert!(consumption_rate(&params, class, 1.0e12) <= class.base_consumption_rate() * 1.5);
    }

    #[test]
    fn test_burn_step_never_overdraws() {
        let params = SpreadParams::default();
        let result = burn_step(&params, VegetationClass::Moderate, 1.0, 0.0);
        assert_eq!(result.fuel_remaining, 0.0);
        assert_relative_eq!(result.consumed, 1.0);
        assert!(result.is_burnt_out());
        assert_relative_eq!(result.intensity, params.heat_yield);

        let result = burn_step(&params, VegetationClass::Moderate, 10.0, 0.0);
        assert_relative_eq!(result.fuel_remaining, 7.0);
        assert!(!result.is_burnt_out());
    }
}
