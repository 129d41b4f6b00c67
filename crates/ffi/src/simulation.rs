use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_sim_mut};
use crate::instance::BushfireSimInstance;
use crate::terrain::BushfireWeather;
use bushfire_risk_core::WeatherCondition;

/// Set the vegetation cell at `(x, y)` burning.
///
/// `out_ignited` (optional) receives whether the cell caught fire. Ignoring an
/// empty, burning, burnt or out-of-grid cell is not an error.
///
/// Thread-safe: acquires the write lock.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
/// - `out_ignited`, if non-null, must point to a writable `bool`.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_ignite(
    ptr: *const BushfireSimInstance,
    x: usize,
    y: usize,
    out_ignited: *mut bool,
) -> BushfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let ignited = with_sim_mut(instance, |sim| sim.ignite(x, y))?;
        if !out_ignited.is_null() {
            unsafe {
                *out_ignited = ignited;
            }
        }
        Ok::<(), DefaultBushfireError>(())
    })
}

/// Advance the simulation one timestep under `weather`.
///
/// A simulation with nothing burning is left untouched.
///
/// Thread-safe: acquires the write lock.
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_step(
    ptr: *const BushfireSimInstance,
    weather: BushfireWeather,
) -> BushfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let weather = WeatherCondition::from(weather);
        with_sim_mut(instance, |sim| {
            sim.step(&weather);
        })?;
        Ok::<(), DefaultBushfireError>(())
    })
}
