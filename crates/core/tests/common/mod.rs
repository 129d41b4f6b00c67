//! Shared helpers for integration tests

use bushfire_risk_core::{TerrainGrid, VegetationClass};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Route library logs through the test harness; filter with `RUST_LOG`
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flat grid of moderate vegetation carrying `fuel_load` t/ha
#[allow(dead_code)]
pub fn flat_terrain(width: usize, height: usize, fuel_load: f64) -> Arc<TerrainGrid> {
    Arc::new(
        TerrainGrid::uniform(width, height, fuel_load, VegetationClass::Moderate)
            .expect("valid terrain"),
    )
}
