//! C ABI for the bushfire risk engine.
//!
//! Simulations are handed out as opaque `BushfireSimInstance` pointers owned by
//! the caller. Every fallible call returns a `BushfireErrorCode`; the message
//! for the last failure on the calling thread is available from
//! `bushfire_get_last_error`.
//!
//! The header `BushfireRiskFFI.h` is generated by the build script.

mod danger;
mod ensemble;
mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;
mod terrain;

pub use danger::{bushfire_classify_rating, bushfire_compute_fdi, BushfireDangerRating};
pub use ensemble::{
    bushfire_assess_risk, bushfire_ensemble_params_default, BushfireEnsembleParams,
    BushfireEnsembleSummary, BushfireIgnitionPoint,
};
pub use error::{bushfire_get_last_error, bushfire_get_last_error_code, BushfireErrorCode};
pub use instance::{bushfire_sim_destroy, bushfire_sim_new, BushfireSimInstance};
pub use queries::{
    bushfire_sim_copy_fuel_grid, bushfire_sim_copy_intensity_grid, bushfire_sim_copy_state_grid,
    bushfire_sim_get_stats, BushfirePhase, BushfireStats,
};
pub use simulation::{bushfire_sim_ignite, bushfire_sim_step};
pub use terrain::{BushfireTerrain, BushfireWeather};
