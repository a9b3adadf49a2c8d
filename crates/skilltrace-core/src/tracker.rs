//! Sequential rating tracker.
//!
//! Folds the estimator over observations in input order, threading each
//! step's rating forward as the next step's prior.

use std::time::{Duration, Instant};

use crate::config::EstimatorConfig;
use crate::error::{ConfigError, ModelDomainError, RatingError};
use crate::estimator::{estimate, GridSearch};
use crate::model::{Observation, RatingPoint, RatingTrace};
use crate::traits::Minimizer;

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_step_complete(&self, point: &RatingPoint);
    fn on_step_error(&self, error: &RatingError);
    fn on_trace_complete(&self, total: usize, completed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_step_complete(&self, _: &RatingPoint) {}
    fn on_step_error(&self, _: &RatingError) {}
    fn on_trace_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Drives a [`Minimizer`] once per observation.
#[derive(Debug, Clone)]
pub struct RatingTracker<M = GridSearch> {
    config: EstimatorConfig,
    minimizer: M,
}

impl RatingTracker<GridSearch> {
    /// Grid-search tracker over the configured interval.
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let minimizer = GridSearch::from_config(&config)?;
        Ok(Self { config, minimizer })
    }
}

impl Default for RatingTracker<GridSearch> {
    fn default() -> Self {
        Self {
            config: EstimatorConfig::default(),
            minimizer: GridSearch::default(),
        }
    }
}

impl<M: Minimizer> RatingTracker<M> {
    pub fn with_minimizer(config: EstimatorConfig, minimizer: M) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, minimizer })
    }

    /// One update from `prior`.
    pub fn step(&self, prior: f64, observation: &Observation) -> Result<f64, ModelDomainError> {
        let rating = estimate(&self.minimizer, prior, self.config.sigma, observation)?;
        let (lower, upper) = self.minimizer.bounds();
        debug_assert!(
            (lower..=upper).contains(&rating),
            "rating {rating} left the searched interval [{lower}, {upper}]"
        );
        Ok(rating)
    }

    /// Rate every observation in order.
    ///
    /// Stops at the first domain failure; the error carries the trace
    /// completed so far.
    pub fn run(&self, observations: &[Observation]) -> Result<RatingTrace, RatingError> {
        self.run_with_progress(observations, &NoopReporter)
    }

    pub fn run_with_progress(
        &self,
        observations: &[Observation],
        progress: &dyn ProgressReporter,
    ) -> Result<RatingTrace, RatingError> {
        let start = Instant::now();

        let result = observations.iter().enumerate().try_fold(
            RatingTrace::new(self.config.initial_prior),
            |mut trace, (index, observation)| {
                let prior = trace.current();
                match self.step(prior, observation) {
                    Ok(rating) => {
                        tracing::debug!(index, prior, rating, %observation, "rating updated");
                        trace.push(*observation, rating);
                        if let Some(point) = trace.points.last() {
                            progress.on_step_complete(point);
                        }
                        Ok(trace)
                    }
                    Err(source) => Err(RatingError {
                        index,
                        observation: *observation,
                        prior,
                        source,
                        completed: trace,
                    }),
                }
            },
        );

        let completed = match &result {
            Ok(trace) => trace.len(),
            Err(e) => {
                progress.on_step_error(e);
                e.completed.len()
            }
        };
        progress.on_trace_complete(observations.len(), completed, start.elapsed());

        result
    }
}
