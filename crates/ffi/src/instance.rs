use bushfire_risk_core::FireSimulation;
use std::ptr;
use std::sync::{Arc, RwLock};

use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::{track_error, track_result};
use crate::terrain::BushfireTerrain;

/// One fire run owned by the caller.
///
/// Created by `bushfire_sim_new` and released by `bushfire_sim_destroy`. There
/// is no global registry: the handle is the only reference to the run.
///
/// # Thread Safety
/// The simulation is guarded by an `RwLock`. Queries take the read lock and
/// may run concurrently; `bushfire_sim_step` and `bushfire_sim_ignite` take the
/// write lock.
pub struct BushfireSimInstance {
    pub(crate) sim: RwLock<FireSimulation>,
}

impl BushfireSimInstance {
    /// # Errors
    ///
    /// Returns `BushfireErrorCode::NullPointer` if a terrain array is null.
    /// Returns `BushfireErrorCode::DataShape` if either dimension is zero.
    /// Returns `BushfireErrorCode::InvalidParameter` for unknown vegetation codes.
    pub(crate) unsafe fn new(
        terrain: &BushfireTerrain,
        seed: u64,
    ) -> Result<Box<Self>, DefaultBushfireError> {
        let grid = unsafe { terrain.to_grid()? };
        let sim = FireSimulation::new(Arc::new(grid), seed);
        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// Create a simulation over the given terrain and return it via out-parameter.
///
/// - Returns `BushfireErrorCode::Ok` (0) on success with a valid instance in `out_instance`
/// - Returns non-zero error code on failure with `out_instance` set to null
///
/// Parameters
/// - `terrain`: grid dimensions and per-cell arrays, copied during the call.
/// - `seed`: seed of the run's random source; equal seeds replay identically.
/// - `out_instance`: pointer to receive the created instance. Must be non-null.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The arrays in `terrain` must each hold `width * height` values.
/// - The caller takes ownership of the returned instance and MUST call
///   `bushfire_sim_destroy` exactly once.
///
/// Example (C)
/// ```c
/// BushfireSimInstance* sim = NULL;
/// if (bushfire_sim_new(terrain, 42, &sim) != Ok) {
///     fprintf(stderr, "%s\n", bushfire_get_last_error());
///     return;
/// }
/// /* ... use sim ... */
/// bushfire_sim_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_new(
    terrain: BushfireTerrain,
    seed: u64,
    out_instance: *mut *mut BushfireSimInstance,
) -> BushfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultBushfireError::null_pointer("out_instance"));
    }

    match track_result(unsafe { BushfireSimInstance::new(&terrain, seed) }) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            crate::helpers::clear_last_error();
            BushfireErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy an instance previously created by `bushfire_sim_new`.
///
/// A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `bushfire_sim_new` and not freed already.
/// - The caller must not use the pointer afterwards.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_destroy(ptr: *mut BushfireSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `bushfire_sim_new` and not yet freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
