use bushfire_risk_core::{SimulationPhase, SimulationStats};

use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::{
    copy_grid, handle_ffi_result_error, instance_from_ptr, slice_from_raw_mut, track_error,
    with_sim,
};
use crate::instance::BushfireSimInstance;

/// Lifecycle phase of a simulation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BushfirePhase {
    /// Nothing ignited yet.
    Idle = 0,
    /// At least one cell burning.
    Active = 1,
    /// Fire out; terminal.
    Extinguished = 2,
}

impl From<SimulationPhase> for BushfirePhase {
    fn from(phase: SimulationPhase) -> Self {
        match phase {
            SimulationPhase::Idle => BushfirePhase::Idle,
            SimulationPhase::Active => BushfirePhase::Active,
            SimulationPhase::Extinguished => BushfirePhase::Extinguished,
        }
    }
}

/// FFI-friendly snapshot of aggregate statistics.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BushfireStats {
    /// Steps taken.
    pub step: u32,
    pub phase: BushfirePhase,
    /// Unburnable cells.
    pub empty_cells: usize,
    /// Unburned vegetation cells.
    pub vegetation_cells: usize,
    /// Burning cells.
    pub burning_cells: usize,
    /// Burnt cells.
    pub burnt_cells: usize,
    /// Burnt area (ha).
    pub burned_area_ha: f64,
    /// Highest fireline intensity (kW/m).
    pub max_intensity: f64,
    /// Burning cells adjacent to unburned vegetation.
    pub perimeter_cells: usize,
}

impl From<SimulationStats> for BushfireStats {
    fn from(stats: SimulationStats) -> Self {
        Self {
            step: stats.step,
            phase: stats.phase.into(),
            empty_cells: stats.counts.empty,
            vegetation_cells: stats.counts.vegetation,
            burning_cells: stats.counts.burning,
            burnt_cells: stats.counts.burnt,
            burned_area_ha: stats.burned_area_ha,
            max_intensity: stats.max_intensity,
            perimeter_cells: stats.perimeter_count,
        }
    }
}

/// Fill `out_stats` with the current aggregate statistics.
///
/// Thread-safe: acquires the read lock.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
/// - `out_stats` must be a valid, non-null pointer to a writable `BushfireStats`.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_get_stats(
    ptr: *const BushfireSimInstance,
    out_stats: *mut BushfireStats,
) -> BushfireErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultBushfireError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_sim(instance, |sim| sim.stats())?;
        unsafe {
            *out_stats = stats.into();
        }
        Ok::<(), DefaultBushfireError>(())
    })
}

/// Copy the per-cell state codes (0 empty, 1 vegetation, 2 burning, 3 burnt)
/// into `out_states`, row-major.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
/// - `out_states` must point to `len` writable bytes; `len` must equal `width * height`.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_copy_state_grid(
    ptr: *const BushfireSimInstance,
    out_states: *mut u8,
    len: usize,
) -> BushfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let out = unsafe { slice_from_raw_mut(out_states, len, "out_states")? };
        with_sim(instance, |sim| {
            let codes: Vec<u8> = sim.state().cells().iter().map(|c| c.state().code()).collect();
            copy_grid(&codes, out, "out_states")
        })?
    })
}

/// Copy the per-cell fireline intensity (kW/m) into `out_intensity`, row-major.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
/// - `out_intensity` must point to `len` writable doubles; `len` must equal `width * height`.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_copy_intensity_grid(
    ptr: *const BushfireSimInstance,
    out_intensity: *mut f64,
    len: usize,
) -> BushfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let out = unsafe { slice_from_raw_mut(out_intensity, len, "out_intensity")? };
        with_sim(instance, |sim| copy_grid(&sim.intensity_grid(), out, "out_intensity"))?
    })
}

/// Copy the per-cell fuel remaining (t/ha) into `out_fuel`, row-major.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `bushfire_sim_new` or null.
/// - `out_fuel` must point to `len` writable doubles; `len` must equal `width * height`.
#[no_mangle]
pub unsafe extern "C" fn bushfire_sim_copy_fuel_grid(
    ptr: *const BushfireSimInstance,
    out_fuel: *mut f64,
    len: usize,
) -> BushfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let out = unsafe { slice_from_raw_mut(out_fuel, len, "out_fuel")? };
        with_sim(instance, |sim| copy_grid(&sim.fuel_remaining_grid(), out, "out_fuel"))?
    })
}
