//! Per-run random sources and scenario/ignition sampling
//!
//! Each Monte Carlo run owns a `ChaCha8Rng` derived from the master seed and
//! its run index alone, so a run draws the same numbers regardless of which
//! worker executes it or in what order.

use crate::error::{FireRiskError, Result};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How to pick one item per run from a candidate list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Weighting {
    /// Every candidate equally likely
    #[default]
    Uniform,
    /// Proportional to each weather scenario's fire danger index
    FireDanger,
    /// Caller-supplied non-negative weights, one per candidate
    Custom(Vec<f64>),
}

/// Sampling rules for the two per-run random choices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingStrategy {
    pub weather: Weighting,
    pub ignition: Weighting,
}

/// Random source for run `run_index` of an ensemble seeded with `seed`
///
/// Same seed, different ChaCha stream per run: the streams never overlap.
pub fn run_rng(seed: u64, run_index: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(u64::from(run_index));
    rng
}

/// Resolved sampler for one candidate list
#[derive(Debug, Clone)]
pub(crate) enum Sampler {
    Uniform(usize),
    Weighted(WeightedIndex<f64>),
}

impl Sampler {
    /// Build a sampler over `len` candidates.
    ///
    /// `danger` supplies per-candidate index values for
    /// [`Weighting::FireDanger`]; candidates without one (ignition points)
    /// reject that weighting.
    pub(crate) fn new(
        what: &str,
        weighting: &Weighting,
        len: usize,
        danger: Option<&[f64]>,
    ) -> Result<Self> {
        if len == 0 {
            return Err(FireRiskError::invalid_parameter(format!(
                "{what} list is empty"
            )));
        }

        let weights = match weighting {
            Weighting::Uniform => return Ok(Sampler::Uniform(len)),
            Weighting::FireDanger => danger.ok_or_else(|| {
                FireRiskError::invalid_parameter(format!(
                    "fire-danger weighting is not defined for {what}"
                ))
            })?,
            Weighting::Custom(weights) => {
                if weights.len() != len {
                    return Err(FireRiskError::invalid_parameter(format!(
                        "{what} weights have {} entries for {len} candidates",
                        weights.len()
                    )));
                }
                weights.as_slice()
            }
        };

        WeightedIndex::new(weights)
            .map(Sampler::Weighted)
            .map_err(|e| FireRiskError::invalid_parameter(format!("{what} weights rejected: {e}")))
    }

    /// Index of the chosen candidate
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Sampler::Uniform(len) => rng.random_range(0..*len),
            Sampler::Weighted(index) => index.sample(rng),
        }
    }
}
