//! Negative log-posterior for a single observation.
//!
//! The likelihood is a Bernoulli log-likelihood with an asymmetric weight:
//! when the item is harder than the candidate ability, a failure costs more
//! and a success costs less. The weight is part of the scoring model.

use crate::error::ModelDomainError;
use crate::model::Observation;
use crate::params::ItemParameters;
use crate::response::probability_with;

/// Probabilities are clamped to `[PROB_EPSILON, 1 - PROB_EPSILON]` before `ln`.
pub const PROB_EPSILON: f64 = 1e-6;

/// Difficulty gap that doubles the weight of a failure.
const WEIGHT_SCALE: f64 = 20.0;

/// `(b - theta) / 20` when the item is harder than `theta`, else `0`.
pub fn asymmetry_weight(theta: f64, difficulty: f64) -> f64 {
    if difficulty > theta {
        (difficulty - theta) / WEIGHT_SCALE
    } else {
        0.0
    }
}

/// Loss surface over candidate abilities for one observation and one prior.
///
/// Item parameters depend only on the observation, so they are derived once
/// on construction and [`PosteriorLoss::evaluate`] cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct PosteriorLoss {
    observation: Observation,
    params: ItemParameters,
    prior: f64,
    sigma: f64,
}

impl PosteriorLoss {
    pub fn new(observation: Observation, prior: f64, sigma: f64) -> Result<Self, ModelDomainError> {
        let params = ItemParameters::derive(observation.difficulty, observation.response_time)?;
        Ok(Self {
            observation,
            params,
            prior,
            sigma,
        })
    }

    /// Weighted Bernoulli negative log-likelihood at `theta`.
    pub fn neg_log_likelihood(&self, theta: f64) -> f64 {
        let b = self.observation.difficulty;
        let x = self.observation.indicator();
        let p = probability_with(&self.params, theta, b).clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
        let weight = asymmetry_weight(theta, b);

        -(x * (1.0 + weight) * p.ln() + (1.0 - x) * (1.0 - weight) * (1.0 - p).ln())
    }

    /// Unnormalised Gaussian penalty toward the prior.
    pub fn neg_log_prior(&self, theta: f64) -> f64 {
        ((theta - self.prior) / self.sigma).powi(2)
    }

    /// Total loss at `theta`; lower is better.
    pub fn evaluate(&self, theta: f64) -> f64 {
        self.neg_log_likelihood(theta) + self.neg_log_prior(theta)
    }
}

/// One-shot loss evaluation, deriving item parameters on every call.
pub fn neg_log_posterior(
    theta: f64,
    observation: &Observation,
    prior: f64,
    sigma: f64,
) -> Result<f64, ModelDomainError> {
    Ok(PosteriorLoss::new(*observation, prior, sigma)?.evaluate(theta))
}
