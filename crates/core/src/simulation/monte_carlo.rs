//! Monte Carlo risk assessment
//!
//! Runs many independent [`FireSimulation`]s over one shared terrain, each
//! with a randomly sampled weather scenario and ignition point, and turns the
//! burnt cells into a per-cell burn probability.
//!
//! # Determinism
//!
//! Run `r` draws everything from [`run_rng`]`(seed, r)`. Per-worker partial
//! results are plain integer counters merged by addition, and the division
//! into probabilities happens once at the end, so the output is bit-identical
//! for any worker count.
//!
//! # Outcomes
//!
//! | Outcome        | Counted in numerator | Counted in denominator |
//! |----------------|----------------------|------------------------|
//! | `Extinguished` | yes                  | yes                    |
//! | `NoIgnition`   | (nothing burnt)      | yes                    |
//! | `Capped`       | no                   | yes                    |
//! | `Failed`       | no                   | yes                    |

use super::sampling::{run_rng, Sampler, SamplingStrategy};
use super::screening::screening_risk_surface;
use super::FireSimulation;
use crate::core_types::{CellState, FireDangerRating, WeatherCondition};
use crate::error::{FireRiskError, Result};
use crate::grid::{FireState, TerrainGrid};
use crate::solver::{CellularSpreadModel, SpreadModel};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ensemble settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Run count used by [`MonteCarloEngine::assess`]
    pub runs: u32,
    /// Master seed; run `r` uses ChaCha stream `r` of this seed
    pub seed: u64,
    /// Step budget per run before it is recorded as capped
    pub max_steps: u32,
    /// Worker threads; 0 lets rayon pick
    pub workers: usize,
    /// Cells with risk strictly above this count toward the area at risk
    pub risk_threshold: f64,
    /// Lower and upper percentile (0-100) for the confidence interval
    pub confidence_percentiles: (f64, f64),
    /// Drought factor used to rate the weather scenarios
    pub drought_factor: f64,
    pub sampling: SamplingStrategy,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        EnsembleConfig {
            runs: 100,
            seed: 42,
            max_steps: 500,
            workers: 0,
            risk_threshold: 0.1,
            confidence_percentiles: (25.0, 75.0),
            drought_factor: 10.0,
            sampling: SamplingStrategy::default(),
        }
    }
}

impl EnsembleConfig {
    fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(FireRiskError::invalid_parameter("max_steps must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.risk_threshold) {
            return Err(FireRiskError::invalid_parameter(format!(
                "risk_threshold must be within [0, 1], got {}",
                self.risk_threshold
            )));
        }
        let (low, high) = self.confidence_percentiles;
        if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low > high {
            return Err(FireRiskError::invalid_parameter(format!(
                "confidence_percentiles must satisfy 0 <= low <= high <= 100, got ({low}, {high})"
            )));
        }
        if !self.drought_factor.is_finite() {
            return Err(FireRiskError::invalid_parameter(format!(
                "drought_factor must be finite, got {}",
                self.drought_factor
            )));
        }
        Ok(())
    }
}

/// Terminal category of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Fire burned out within the step budget
    Extinguished,
    /// Step budget exhausted with cells still burning
    Capped,
    /// Sampled ignition point held no vegetation
    NoIgnition,
    /// Run panicked; its partial state is discarded
    Failed,
}

/// Per-cell burn probability in `[0, 1]`, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSurface {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl RiskSurface {
    pub(super) fn from_values(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        RiskSurface {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Risk at `(x, y)`, or `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.values[y * self.width + x])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Number of cells whose risk is strictly above `threshold`
    pub fn cells_above(&self, threshold: f64) -> usize {
        self.values.iter().filter(|&&v| v > threshold).count()
    }

    /// Linear-interpolated percentile (0-100) of the nonzero values, or 0
    /// when nothing burned
    pub fn nonzero_percentile(&self, percentile: f64) -> f64 {
        let mut nonzero: Vec<f64> = self
            .values
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .collect();
        nonzero.sort_by(f64::total_cmp);
        percentile_sorted(&nonzero, percentile)
    }
}

/// Result of one ensemble analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_surface: RiskSurface,
    /// Area (ha) of cells with risk above `risk_threshold`
    pub area_at_risk_ha: f64,
    pub risk_threshold: f64,
    /// Percentile bounds of the nonzero risk values
    pub confidence_interval: (f64, f64),
    /// `confidence_interval` scaled by the area at risk (ha)
    pub area_interval_ha: (f64, f64),

    pub runs: u32,
    pub completed_runs: u32,
    pub capped_runs: u32,
    pub no_ignition_runs: u32,
    pub failed_runs: u32,

    /// Mean FDI over the supplied weather scenarios
    pub mean_fdi: f64,
    pub danger_rating: FireDangerRating,
    /// Runs per rating of the weather scenario they sampled
    pub rating_histogram: FxHashMap<FireDangerRating, u32>,

    pub seed: u64,
    pub workers: usize,
}

impl RiskAssessment {
    /// Runs that ended in `outcome`
    pub fn outcome_count(&self, outcome: RunOutcome) -> u32 {
        match outcome {
            RunOutcome::Extinguished => self.completed_runs,
            RunOutcome::Capped => self.capped_runs,
            RunOutcome::NoIgnition => self.no_ignition_runs,
            RunOutcome::Failed => self.failed_runs,
        }
    }
}

/// Integer partial results of a batch of runs
struct Tally {
    burnt: Vec<u32>,
    outcomes: [u32; 4],
    ratings: [u32; FireDangerRating::ALL.len()],
}

impl Tally {
    fn new(cells: usize) -> Self {
        Tally {
            burnt: vec![0; cells],
            outcomes: [0; 4],
            ratings: [0; FireDangerRating::ALL.len()],
        }
    }

    fn record(
        &mut self,
        outcome: RunOutcome,
        rating: Option<FireDangerRating>,
        state: Option<FireState>,
    ) {
        self.outcomes[outcome_slot(outcome)] += 1;
        if let Some(rating) = rating {
            self.ratings[rating as usize] += 1;
        }
        if outcome != RunOutcome::Extinguished {
            return;
        }
        if let Some(state) = state {
            for (count, cell) in self.burnt.iter_mut().zip(state.cells()) {
                if cell.state() == CellState::Burnt {
                    *count += 1;
                }
            }
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.burnt.iter_mut().zip(&other.burnt) {
            *a += b;
        }
        for (a, b) in self.outcomes.iter_mut().zip(other.outcomes) {
            *a += b;
        }
        for (a, b) in self.ratings.iter_mut().zip(other.ratings) {
            *a += b;
        }
        self
    }
}

fn outcome_slot(outcome: RunOutcome) -> usize {
    match outcome {
        RunOutcome::Extinguished => 0,
        RunOutcome::Capped => 1,
        RunOutcome::NoIgnition => 2,
        RunOutcome::Failed => 3,
    }
}

/// Validated inputs shared by every run of one analysis
struct EnsemblePlan<'a> {
    scenarios: Vec<WeatherCondition>,
    scenario_fdi: Vec<f64>,
    scenario_ratings: Vec<FireDangerRating>,
    ignitions: &'a [(usize, usize)],
    weather_sampler: Sampler,
    ignition_sampler: Sampler,
}

/// Ensemble driver over one shared terrain
pub struct MonteCarloEngine {
    terrain: Arc<TerrainGrid>,
    model: Arc<dyn SpreadModel>,
    config: EnsembleConfig,
}

impl MonteCarloEngine {
    /// Engine with the default cellular spread model
    #[must_use]
    pub fn new(terrain: Arc<TerrainGrid>, config: EnsembleConfig) -> Self {
        Self::with_model(terrain, Arc::new(CellularSpreadModel::default()), config)
    }

    #[must_use]
    pub fn with_model(
        terrain: Arc<TerrainGrid>,
        model: Arc<dyn SpreadModel>,
        config: EnsembleConfig,
    ) -> Self {
        MonteCarloEngine {
            terrain,
            model,
            config,
        }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Deterministic screening surface for `weather` around `ignitions`;
    /// see [`screening_risk_surface`]. Rated with the configured drought
    /// factor.
    ///
    /// # Errors
    ///
    /// [`FireRiskError::InvalidParameter`] if `ignitions` is empty or a point
    /// lies outside the grid.
    pub fn screening_risk_surface(
        &self,
        weather: &WeatherCondition,
        ignitions: &[(usize, usize)],
    ) -> Result<RiskSurface> {
        let fdi = weather.clamped().fdi(self.config.drought_factor);
        screening_risk_surface(&self.terrain, fdi, ignitions)
    }

    /// [`MonteCarloEngine::assess_risk`] with the configured run count
    ///
    /// # Errors
    ///
    /// See [`MonteCarloEngine::assess_risk`].
    pub fn assess(
        &self,
        weather: &[WeatherCondition],
        ignitions: &[(usize, usize)],
    ) -> Result<RiskAssessment> {
        self.assess_risk(weather, ignitions, self.config.runs)
    }

    /// Run `runs` independent simulations and aggregate the burnt cells into
    /// a risk surface.
    ///
    /// # Errors
    ///
    /// [`FireRiskError::InvalidParameter`] before any run starts if `runs` is
    /// zero, either candidate list is empty, an ignition point lies outside
    /// the grid, the sampling weights are malformed, or the configuration is
    /// out of range.
    pub fn assess_risk(
        &self,
        weather: &[WeatherCondition],
        ignitions: &[(usize, usize)],
        runs: u32,
    ) -> Result<RiskAssessment> {
        let plan = self.plan(weather, ignitions, runs)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| {
                FireRiskError::invalid_parameter(format!("cannot start worker pool: {e}"))
            })?;
        let workers = pool.current_num_threads();

        info!(
            "Starting risk assessment: {} runs, {} scenarios, {} ignition points, {} workers, seed {}",
            runs,
            plan.scenarios.len(),
            plan.ignitions.len(),
            workers,
            self.config.seed
        );

        let cells = self.terrain.len();
        let tally = pool.install(|| {
            (0..runs)
                .into_par_iter()
                .fold(
                    || Tally::new(cells),
                    |mut tally, run| {
                        let (outcome, rating, state) = self.guarded_run(&plan, run);
                        tally.record(outcome, rating, state);
                        tally
                    },
                )
                .reduce(|| Tally::new(cells), Tally::merge)
        });

        let assessment = self.summarize(&plan, tally, runs, workers);

        if assessment.capped_runs > 0 {
            warn!(
                "{} of {} runs hit the {}-step cap and were excluded from burn counts",
                assessment.capped_runs, runs, self.config.max_steps
            );
        }
        if assessment.failed_runs > 0 {
            warn!("{} of {} runs failed", assessment.failed_runs, runs);
        }
        info!(
            "Risk assessment complete: {} extinguished, {} capped, {} no ignition, {} failed, {:.1} ha at risk",
            assessment.completed_runs,
            assessment.capped_runs,
            assessment.no_ignition_runs,
            assessment.failed_runs,
            assessment.area_at_risk_ha
        );

        Ok(assessment)
    }

    fn plan<'a>(
        &self,
        weather: &[WeatherCondition],
        ignitions: &'a [(usize, usize)],
        runs: u32,
    ) -> Result<EnsemblePlan<'a>> {
        if runs == 0 {
            return Err(FireRiskError::invalid_parameter("run count must be at least 1"));
        }
        if weather.is_empty() {
            return Err(FireRiskError::invalid_parameter("no weather scenarios supplied"));
        }
        check_ignitions(&self.terrain, ignitions)?;
        self.config.validate()?;

        // Clamp once up front so runs never re-log the same adjustment
        let scenarios: Vec<WeatherCondition> =
            weather.iter().map(WeatherCondition::clamped).collect();
        let scenario_fdi: Vec<f64> = scenarios
            .iter()
            .map(|w| w.fdi(self.config.drought_factor))
            .collect();
        let scenario_ratings = scenario_fdi
            .iter()
            .map(|&v| FireDangerRating::classify(v))
            .collect();

        let weather_sampler = Sampler::new(
            "weather scenario",
            &self.config.sampling.weather,
            scenarios.len(),
            Some(&scenario_fdi),
        )?;
        let ignition_sampler = Sampler::new(
            "ignition point",
            &self.config.sampling.ignition,
            ignitions.len(),
            None,
        )?;

        Ok(EnsemblePlan {
            scenarios,
            scenario_fdi,
            scenario_ratings,
            ignitions,
            weather_sampler,
            ignition_sampler,
        })
    }

    /// One run with panics converted into a `Failed` outcome
    fn guarded_run(
        &self,
        plan: &EnsemblePlan<'_>,
        run: u32,
    ) -> (RunOutcome, Option<FireDangerRating>, Option<FireState>) {
        match catch_unwind(AssertUnwindSafe(|| self.simulate_run(plan, run))) {
            Ok((outcome, rating, state)) => (outcome, Some(rating), Some(state)),
            Err(_) => {
                warn!("Run {} panicked and was recorded as failed", run);
                (RunOutcome::Failed, None, None)
            }
        }
    }

    fn simulate_run(
        &self,
        plan: &EnsemblePlan<'_>,
        run: u32,
    ) -> (RunOutcome, FireDangerRating, FireState) {
        let mut rng = run_rng(self.config.seed, run);
        let scenario = plan.weather_sampler.sample(&mut rng);
        let (x, y) = plan.ignitions[plan.ignition_sampler.sample(&mut rng)];
        let weather = plan.scenarios[scenario];
        let rating = plan.scenario_ratings[scenario];

        let mut sim =
            FireSimulation::with_model(Arc::clone(&self.terrain), Arc::clone(&self.model), rng);
        let outcome = if !sim.ignite(x, y) {
            RunOutcome::NoIgnition
        } else if sim.run_until_extinguished(&weather, self.config.max_steps) {
            RunOutcome::Extinguished
        } else {
            RunOutcome::Capped
        };

        debug!(
            "Run {}: {:?} after {} steps, scenario {}, ignition ({}, {}), {:.2} ha burnt",
            run,
            outcome,
            sim.step_count(),
            scenario,
            x,
            y,
            sim.burned_area()
        );
        (outcome, rating, sim.into_state())
    }

    fn summarize(
        &self,
        plan: &EnsemblePlan<'_>,
        tally: Tally,
        runs: u32,
        workers: usize,
    ) -> RiskAssessment {
        let denominator = f64::from(runs);
        let risk_surface = RiskSurface::from_values(
            self.terrain.width(),
            self.terrain.height(),
            tally
                .burnt
                .iter()
                .map(|&count| f64::from(count) / denominator)
                .collect(),
        );

        let threshold = self.config.risk_threshold;
        let area_at_risk_ha =
            risk_surface.cells_above(threshold) as f64 * self.terrain.cell_area_hectares();

        let (low_pct, high_pct) = self.config.confidence_percentiles;
        let confidence_interval = (
            risk_surface.nonzero_percentile(low_pct),
            risk_surface.nonzero_percentile(high_pct),
        );
        let area_interval_ha = (
            confidence_interval.0 * area_at_risk_ha,
            confidence_interval.1 * area_at_risk_ha,
        );

        let mean_fdi = plan.scenario_fdi.iter().sum::<f64>() / plan.scenario_fdi.len() as f64;

        let rating_histogram = FireDangerRating::ALL
            .iter()
            .zip(tally.ratings)
            .filter(|&(_, count)| count > 0)
            .map(|(&rating, count)| (rating, count))
            .collect();

        RiskAssessment {
            risk_surface,
            area_at_risk_ha,
            risk_threshold: threshold,
            confidence_interval,
            area_interval_ha,
            runs,
            completed_runs: tally.outcomes[outcome_slot(RunOutcome::Extinguished)],
            capped_runs: tally.outcomes[outcome_slot(RunOutcome::Capped)],
            no_ignition_runs: tally.outcomes[outcome_slot(RunOutcome::NoIgnition)],
            failed_runs: tally.outcomes[outcome_slot(RunOutcome::Failed)],
            mean_fdi,
            danger_rating: FireDangerRating::classify(mean_fdi),
            rating_histogram,
            seed: self.config.seed,
            workers,
        }
    }
}

/// Reject an empty ignition list or any point outside `terrain`
pub(super) fn check_ignitions(terrain: &TerrainGrid, ignitions: &[(usize, usize)]) -> Result<()> {
    if ignitions.is_empty() {
        return Err(FireRiskError::invalid_parameter("no ignition points supplied"));
    }
    if let Some(&(x, y)) = ignitions
        .iter()
        .find(|&&(x, y)| terrain.index(x, y).is_none())
    {
        return Err(FireRiskError::invalid_parameter(format!(
            "ignition point ({x}, {y}) lies outside the {}x{} grid",
            terrain.width(),
            terrain.height()
        )));
    }
    Ok(())
}

/// Numpy-style linear interpolation between closest ranks; 0 for no data
fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let fraction = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::VegetationClass;
    use crate::simulation::Weighting;
    use approx::assert_relative_eq;

    fn engine(size: usize, config: EnsembleConfig) -> MonteCarloEngine {
        let terrain = TerrainGrid::uniform(size, size, 10.0, VegetationClass::Moderate).unwrap();
        MonteCarloEngine::new(Arc::new(terrain), config)
    }

    #[test]
    fn test_percentile_matches_linear_interpolation() {
        let values = [0.1, 0.2, 0.3, 0.4, 0.5];
        assert_relative_eq!(percentile_sorted(&values, 25.0), 0.2);
        assert_relative_eq!(percentile_sorted(&values, 75.0), 0.4);
        assert_relative_eq!(percentile_sorted(&[0.1, 0.2], 25.0), 0.125);
        assert_eq!(percentile_sorted(&[], 25.0), 0.0);
        assert_eq!(percentile_sorted(&[0.7], 75.0), 0.7);
    }

    #[test]
    fn test_rejects_bad_parameters_before_running() {
        let engine = engine(5, EnsembleConfig::default());
        let weather = [WeatherCondition::default()];

        let cases: [(&[WeatherCondition], &[(usize, usize)], u32); 4] = [
            (&weather, &[(1, 1)], 0),
            (&[], &[(1, 1)], 10),
            (&weather, &[], 10),
            (&weather, &[(1, 1), (5, 0)], 10),
        ];
        for (weather, ignitions, runs) in cases {
            let err = engine.assess_risk(weather, ignitions, runs).unwrap_err();
            assert!(matches!(err, FireRiskError::InvalidParameter(_)), "{err}");
        }

        let capped = self::engine(
            5,
            EnsembleConfig {
                max_steps: 0,
                ..EnsembleConfig::default()
            },
        );
        assert!(capped.assess_risk(&weather, &[(1, 1)], 5).is_err());

        let weighted = self::engine(
            5,
            EnsembleConfig {
                sampling: SamplingStrategy {
                    weather: Weighting::Custom(vec![1.0, 2.0]),
                    ignition: Weighting::Uniform,
                },
                ..EnsembleConfig::default()
            },
        );
        assert!(weighted.assess_risk(&weather, &[(1, 1)], 5).is_err());
    }

    #[test]
    fn test_outcomes_account_for_every_run() {
        let engine = engine(
            8,
            EnsembleConfig {
                max_steps: 3,
                workers: 2,
                ..EnsembleConfig::default()
            },
        );
        let weather = [WeatherCondition::new(35.0, 20.0, 30.0, 90.0)];
        let assessment = engine.assess_risk(&weather, &[(4, 4)], 20).unwrap();

        // Three steps cannot burn out a 10 t/ha fire front
        assert_eq!(assessment.capped_runs, 20);
        assert_eq!(assessment.completed_runs, 0);
        assert_eq!(assessment.risk_surface.max(), 0.0);
        assert_eq!(assessment.confidence_interval, (0.0, 0.0));
        assert_eq!(assessment.area_at_risk_ha, 0.0);
    }

    #[test]
    fn test_empty_ignition_cell_is_no_ignition() {
        let terrain = TerrainGrid::uniform(4, 4, 0.0, VegetationClass::Sparse).unwrap();
        let engine = MonteCarloEngine::new(Arc::new(terrain), EnsembleConfig::default());
        let assessment = engine
            .assess_risk(&[WeatherCondition::catastrophic()], &[(0, 0)], 7)
            .unwrap();
        assert_eq!(assessment.no_ignition_runs, 7);
        assert_eq!(assessment.outcome_count(RunOutcome::NoIgnition), 7);
        assert!(assessment.risk_surface.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rating_histogram_counts_runs() {
        let engine = engine(6, EnsembleConfig::default());
        let weather = [WeatherCondition::catastrophic(), WeatherCondition::mild()];
        let assessment = engine.assess_risk(&weather, &[(3, 3)], 40).unwrap();

        let total: u32 = assessment.rating_histogram.values().sum();
        assert_eq!(total, 40);
        assert!(assessment.rating_histogram.contains_key(&FireDangerRating::Catastrophic));
        assert_eq!(assessment.seed, 42);
        assert!(assessment.workers >= 1);
    }
}
