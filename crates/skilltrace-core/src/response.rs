//! Three-parameter logistic response model.

use crate::error::ModelDomainError;
use crate::params::ItemParameters;

/// Logistic curve in plain IEEE arithmetic.
///
/// A zero slope makes a step: 0 below the inflection point, 1 above it, and
/// NaN exactly on it (`0 / 0`). A NaN loss never wins the strict `<` in the
/// grid search, so that candidate is simply never chosen.
fn logistic(delta: f64, slope: f64) -> f64 {
    1.0 / (1.0 + (-delta / slope).exp())
}

/// `P(correct | theta)` for an item with already-derived parameters.
///
/// `c + (1 - c) / (1 + exp(-(theta - b) / s_eff))`. The result is a raw
/// probability; callers clamp before taking logarithms. With `T == 0` it is
/// NaN at `theta == b`.
pub fn probability_with(params: &ItemParameters, theta: f64, difficulty: f64) -> f64 {
    let c = params.guessing_floor;
    c + (1.0 - c) * logistic(theta - difficulty, params.effective_slope)
}

/// `P(correct | theta, b, T)`, deriving the item parameters first.
pub fn probability_correct(
    theta: f64,
    difficulty: f64,
    response_time: f64,
) -> Result<f64, ModelDomainError> {
    let params = ItemParameters::derive(difficulty, response_time)?;
    Ok(probability_with(&params, theta, difficulty))
}
