use bushfire_risk_core::{EnsembleConfig, MonteCarloEngine, WeatherCondition};
use std::sync::Arc;

use crate::danger::BushfireDangerRating;
use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::{
    copy_grid, handle_ffi_result_error, slice_from_raw, slice_from_raw_mut, track_error,
};
use crate::terrain::{BushfireTerrain, BushfireWeather};

/// Ensemble settings. Start from `bushfire_ensemble_params_default`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireEnsembleParams {
    /// Number of simulation runs.
    pub runs: u32,
    /// Master seed; equal seeds give identical results for any worker count.
    pub seed: u64,
    /// Step budget per run.
    pub max_steps: u32,
    /// Worker threads; 0 picks one per core.
    pub workers: usize,
    /// Cells with risk above this count toward the area at risk.
    pub risk_threshold: f64,
}

impl From<BushfireEnsembleParams> for EnsembleConfig {
    fn from(params: BushfireEnsembleParams) -> Self {
        EnsembleConfig {
            runs: params.runs,
            seed: params.seed,
            max_steps: params.max_steps,
            workers: params.workers,
            risk_threshold: params.risk_threshold,
            ..EnsembleConfig::default()
        }
    }
}

/// Candidate ignition location.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireIgnitionPoint {
    pub x: usize,
    pub y: usize,
}

/// Scalar results of an ensemble analysis.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireEnsembleSummary {
    /// Area (ha) of cells above the risk threshold.
    pub area_at_risk_ha: f64,
    /// 25th percentile of nonzero cell risk.
    pub confidence_low: f64,
    /// 75th percentile of nonzero cell risk.
    pub confidence_high: f64,
    pub area_low_ha: f64,
    pub area_high_ha: f64,
    pub runs: u32,
    /// Runs that burned out within the step budget.
    pub completed_runs: u32,
    /// Runs stopped at the step budget.
    pub capped_runs: u32,
    /// Runs whose ignition point held no vegetation.
    pub no_ignition_runs: u32,
    /// Runs that failed and were discarded.
    pub failed_runs: u32,
    pub mean_fdi: f64,
    pub danger_rating: BushfireDangerRating,
}

/// Default ensemble settings: 100 runs, seed 42, 500 steps, automatic workers,
/// threshold 0.1.
#[no_mangle]
pub extern "C" fn bushfire_ensemble_params_default() -> BushfireEnsembleParams {
    let config = EnsembleConfig::default();
    BushfireEnsembleParams {
        runs: config.runs,
        seed: config.seed,
        max_steps: config.max_steps,
        workers: config.workers,
        risk_threshold: config.risk_threshold,
    }
}

/// Run a Monte Carlo ensemble and write the per-cell risk surface.
///
/// Each run draws one weather scenario and one ignition point uniformly from
/// the supplied lists.
///
/// Parameters
/// - `out_risk`: receives `width * height` burn probabilities, row-major.
/// - `out_summary`: receives the scalar results; may be null.
///
/// Returns `InvalidParameter` before any run starts for zero runs, empty
/// lists or ignition points outside the grid.
///
/// # Safety
///
/// - `terrain` arrays must each hold `width * height` values.
/// - `weather` must point to `weather_len` values; `ignitions` to `ignitions_len`.
/// - `out_risk` must point to `out_len` writable doubles.
/// - `out_summary`, if non-null, must point to a writable `BushfireEnsembleSummary`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn bushfire_assess_risk(
    terrain: BushfireTerrain,
    weather: *const BushfireWeather,
    weather_len: usize,
    ignitions: *const BushfireIgnitionPoint,
    ignitions_len: usize,
    params: BushfireEnsembleParams,
    out_risk: *mut f64,
    out_len: usize,
    out_summary: *mut BushfireEnsembleSummary,
) -> BushfireErrorCode {
    if out_risk.is_null() {
        return track_error(&DefaultBushfireError::null_pointer("out_risk"));
    }

    handle_ffi_result_error(|| {
        let grid = unsafe { terrain.to_grid()? };
        let weather: Vec<WeatherCondition> = unsafe { slice_from_raw(weather, weather_len, "weather")? }
            .iter()
            .copied()
            .map(WeatherCondition::from)
            .collect();
        let ignitions: Vec<(usize, usize)> =
            unsafe { slice_from_raw(ignitions, ignitions_len, "ignitions")? }
                .iter()
                .map(|p| (p.x, p.y))
                .collect();
        let out = unsafe { slice_from_raw_mut(out_risk, out_len, "out_risk")? };

        let engine = MonteCarloEngine::new(Arc::new(grid), params.into());
        let assessment = engine.assess(&weather, &ignitions)?;
        copy_grid(assessment.risk_surface.values(), out, "out_risk")?;

        if !out_summary.is_null() {
            let summary = BushfireEnsembleSummary {
                area_at_risk_ha: assessment.area_at_risk_ha,
                confidence_low: assessment.confidence_interval.0,
                confidence_high: assessment.confidence_interval.1,
                area_low_ha: assessment.area_interval_ha.0,
                area_high_ha: assessment.area_interval_ha.1,
                runs: assessment.runs,
                completed_runs: assessment.completed_runs,
                capped_runs: assessment.capped_runs,
                no_ignition_runs: assessment.no_ignition_runs,
                failed_runs: assessment.failed_runs,
                mean_fdi: assessment.mean_fdi,
                danger_rating: assessment.danger_rating.into(),
            };
            unsafe {
                *out_summary = summary;
            }
        }
        Ok(())
    })
}
