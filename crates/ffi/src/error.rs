use bushfire_risk_core::FireRiskError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait BushfireError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> BushfireErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `BushfireError` for FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultBushfireError {
    code: BushfireErrorCode,
    msg: String,
}

impl DefaultBushfireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: BushfireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: BushfireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a caller buffer whose length does not match the grid.
    pub fn buffer_size(param_name: &str, expected: usize, actual: usize) -> Self {
        Self {
            code: BushfireErrorCode::DataShape,
            msg: format!("Buffer '{param_name}' holds {actual} values, expected {expected}"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: BushfireErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl BushfireError for DefaultBushfireError {
    fn code(&self) -> BushfireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<FireRiskError> for DefaultBushfireError {
    fn from(error: FireRiskError) -> Self {
        let code = match error {
            FireRiskError::DataShape { .. } | FireRiskError::EmptyGrid { .. } => {
                BushfireErrorCode::DataShape
            }
            FireRiskError::InvalidParameter(_) => BushfireErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by bushfire functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BushfireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Terrain arrays or output buffers do not match the grid dimensions.
    DataShape = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,
}

impl From<DefaultBushfireError> for BushfireErrorCode {
    fn from(error: DefaultBushfireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is owned here so the pointer handed to C stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, BushfireErrorCode)> = const { RefCell::new((None, BushfireErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, BushfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, BushfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// BushfireSimInstance* sim = NULL;
/// BushfireErrorCode err = bushfire_sim_new(terrain, 42, &sim);
/// if (err != Ok) {
///     const char* error = bushfire_get_last_error();
///     if (error) {
///         printf("Simulation creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn bushfire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
///
/// Error state is per-thread.
#[no_mangle]
pub extern "C" fn bushfire_get_last_error_code() -> BushfireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
