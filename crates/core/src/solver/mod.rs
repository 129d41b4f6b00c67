//! Fire spread solver module
//!
//! The core abstraction is the [`SpreadModel`] trait: one synchronous,
//! stochastic timestep over a [`crate::grid::FireState`]. The shipped
//! implementation is [`CellularSpreadModel`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bushfire_risk_core::solver::{create_spread_model, SpreadParams};
//!
//! let model = create_spread_model(SpreadParams::default())?;
//! ```

mod cellular;
mod params;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use cellular::CellularSpreadModel;
pub use params::SpreadParams;
pub use r#trait::{SpreadModel, StepReport};

use crate::error::Result;
use tracing::debug;

/// Create the default spread model after validating its coefficients
///
/// # Errors
///
/// [`crate::FireRiskError::InvalidParameter`] if any coefficient is negative,
/// non-finite, or a zero divisor.
pub fn create_spread_model(params: SpreadParams) -> Result<Box<dyn SpreadModel>> {
    params.validate()?;
    let model = CellularSpreadModel::new(params);
    debug!("Created {} spread model: {:?}", model.name(), params);
    Ok(Box::new(model))
}
