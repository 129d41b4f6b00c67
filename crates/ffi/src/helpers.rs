use crate::error::{with_last_error_mut, BushfireError, BushfireErrorCode, DefaultBushfireError};
use crate::instance::BushfireSimInstance;
use bushfire_risk_core::FireSimulation;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `BushfireError` trait.
pub(crate) fn set_last_error(error: &impl BushfireError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl BushfireError) -> BushfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result and hand back its code.
pub(crate) fn track_result<T>(result: Result<T, DefaultBushfireError>) -> Result<T, BushfireErrorCode> {
    result.map_err(|error| track_error(&error))
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = BushfireErrorCode::Ok;
    });
}

/// Run an FFI body, translating its result into an error code and keeping
/// the thread-local last error in sync.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> BushfireErrorCode
where
    F: FnOnce() -> Result<(), DefaultBushfireError>,
{
    match track_result(f()) {
        Ok(()) => {
            clear_last_error();
            BushfireErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Borrow an instance from a raw pointer handed out by `bushfire_sim_new`.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const BushfireSimInstance,
) -> Result<&'a BushfireSimInstance, DefaultBushfireError> {
    // SAFETY: non-null pointers come from `Box::into_raw` in `bushfire_sim_new`
    // and stay valid until `bushfire_sim_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultBushfireError::null_pointer("ptr"))
}

/// Run `f` under the instance's read lock.
pub(crate) fn with_sim<F, R>(instance: &BushfireSimInstance, f: F) -> Result<R, DefaultBushfireError>
where
    F: FnOnce(&FireSimulation) -> R,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultBushfireError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the instance's write lock.
pub(crate) fn with_sim_mut<F, R>(
    instance: &BushfireSimInstance,
    f: F,
) -> Result<R, DefaultBushfireError>
where
    F: FnOnce(&mut FireSimulation) -> R,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultBushfireError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}

/// View a caller-owned input array as a slice.
///
/// # Safety
///
/// Non-null `ptr` must point to `len` initialized values that stay valid for `'a`.
pub(crate) unsafe fn slice_from_raw<'a, T>(
    ptr: *const T,
    len: usize,
    name: &str,
) -> Result<&'a [T], DefaultBushfireError> {
    if ptr.is_null() {
        return Err(DefaultBushfireError::null_pointer(name));
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// View a caller-owned output buffer as a mutable slice.
///
/// # Safety
///
/// Non-null `ptr` must point to `len` writable values, unaliased for `'a`.
pub(crate) unsafe fn slice_from_raw_mut<'a, T>(
    ptr: *mut T,
    len: usize,
    name: &str,
) -> Result<&'a mut [T], DefaultBushfireError> {
    if ptr.is_null() {
        return Err(DefaultBushfireError::null_pointer(name));
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
}

/// Copy a grid into a caller buffer of exactly matching length.
pub(crate) fn copy_grid<T: Copy>(
    source: &[T],
    out: &mut [T],
    name: &str,
) -> Result<(), DefaultBushfireError> {
    if out.len() != source.len() {
        return Err(DefaultBushfireError::buffer_size(name, source.len(), out.len()));
    }
    out.copy_from_slice(source);
    Ok(())
}
