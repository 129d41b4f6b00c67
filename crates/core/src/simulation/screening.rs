//! Deterministic risk screening
//!
//! A quick, simulation-free estimate used to pick areas worth a full
//! ensemble. Each cell scores
//!
//! ```text
//! FDI / 100 * exp(-d / 50) * fuel_load / 20 * screening_factor(vegetation)
//! ```
//!
//! where `d` is the distance in cells to an ignition point, taking the
//! highest score over all points. Scores are clamped into `[0, 1]`.

use super::monte_carlo::{check_ignitions, RiskSurface};
use crate::error::Result;
use crate::grid::TerrainGrid;
use rayon::prelude::*;

/// Distance (cells) over which an ignition's influence falls by a factor of e
pub const SCREENING_RANGE_CELLS: f64 = 50.0;

/// Fuel load (t/ha) that scores a full fuel factor of 1
pub const SCREENING_REFERENCE_FUEL: f64 = 20.0;

/// Score every cell of `terrain` against `ignitions` under a fire danger
/// index of `fdi`.
///
/// # Errors
///
/// [`crate::FireRiskError::InvalidParameter`] if `ignitions` is empty or a
/// point lies outside the grid.
pub fn screening_risk_surface(
    terrain: &TerrainGrid,
    fdi: f64,
    ignitions: &[(usize, usize)],
) -> Result<RiskSurface> {
    check_ignitions(terrain, ignitions)?;

    let base = if fdi.is_finite() { fdi.max(0.0) / 100.0 } else { 0.0 };
    let width = terrain.width();

    let values = (0..terrain.len())
        .into_par_iter()
        .map(|i| {
            let (x, y) = (i % width, i / width);
            let cell_weight = base
                * (terrain.fuel_load_at(i) / SCREENING_REFERENCE_FUEL)
                * terrain.vegetation_at(i).screening_factor();

            let nearest = ignitions
                .iter()
                .map(|&(ix, iy)| {
                    let dx = x as f64 - ix as f64;
                    let dy = y as f64 - iy as f64;
                    dx.hypot(dy)
                })
                .fold(f64::INFINITY, f64::min);

            (cell_weight * (-nearest / SCREENING_RANGE_CELLS).exp()).clamp(0.0, 1.0)
        })
        .collect();

    Ok(RiskSurface::from_values(width, terrain.height(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::VegetationClass;
    use crate::error::FireRiskError;
    use crate::grid::TerrainConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_matches_formula() {
        let terrain = TerrainGrid::uniform(20, 1, 10.0, VegetationClass::Dense).unwrap();
        let surface = screening_risk_surface(&terrain, 40.0, &[(0, 0)]).unwrap();

        let at = |d: f64| 0.4 * (-d / 50.0).exp() * 0.5 * 0.9;
        assert_relative_eq!(surface.get(0, 0).unwrap(), at(0.0), epsilon = 1e-12);
        assert_relative_eq!(surface.get(10, 0).unwrap(), at(10.0), epsilon = 1e-12);
        assert!(surface.get(19, 0).unwrap() < surface.get(1, 0).unwrap());
    }

    #[test]
    fn test_takes_highest_over_ignitions() {
        let terrain = TerrainGrid::uniform(30, 1, 10.0, VegetationClass::Moderate).unwrap();
        let left = screening_risk_surface(&terrain, 50.0, &[(0, 0)]).unwrap();
        let both = screening_risk_surface(&terrain, 50.0, &[(0, 0), (29, 0)]).unwrap();

        assert_eq!(both.get(0, 0), left.get(0, 0));
        assert_eq!(both.get(29, 0), both.get(0, 0));
        for x in 0..30 {
            assert!(both.get(x, 0).unwrap() >= left.get(x, 0).unwrap());
        }
    }

    #[test]
    fn test_vegetation_and_fuel_weight_scores() {
        let terrain = TerrainGrid::from_codes(
            3,
            1,
            vec![0.0; 3],
            vec![10.0, 10.0, 0.0],
            &[0, 3, 3],
            TerrainConfig::default(),
        )
        .unwrap();
        let surface = screening_risk_surface(&terrain, 60.0, &[(1, 0)]).unwrap();

        assert!(surface.get(0, 0).unwrap() < surface.get(1, 0).unwrap());
        assert_eq!(surface.get(2, 0), Some(0.0));
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        let terrain = TerrainGrid::uniform(4, 4, 60.0, VegetationClass::Extreme).unwrap();
        let surface = screening_risk_surface(&terrain, 300.0, &[(2, 2)]).unwrap();
        assert_eq!(surface.max(), 1.0);
        assert!(surface.values().iter().all(|v| (0.0..=1.0).contains(v)));

        let nan = screening_risk_surface(&terrain, f64::NAN, &[(2, 2)]).unwrap();
        assert_eq!(nan.max(), 0.0);
    }

    #[test]
    fn test_rejects_bad_ignitions() {
        let terrain = TerrainGrid::uniform(4, 4, 10.0, VegetationClass::Moderate).unwrap();
        for ignitions in [&[][..], &[(4, 0)][..]] {
            let err = screening_risk_surface(&terrain, 20.0, ignitions).unwrap_err();
            assert!(matches!(err, FireRiskError::InvalidParameter(_)), "{err}");
        }
    }
}
