//! Item parameter model.
//!
//! Every item parameter is a fixed, deterministic function of difficulty `b`
//! (and, for the effective slope, response time `T`). Nothing here is fitted.

use serde::{Deserialize, Serialize};

use crate::error::ModelDomainError;

const REF_TIME_OFFSET: f64 = -9.48;
const REF_TIME_SCALE: f64 = 18.03;
const REF_TIME_RATE: f64 = 0.0392;

/// Logistic slope before time adjustment: `6 + 20 * (b / 100)`.
pub fn base_slope(difficulty: f64) -> f64 {
    6.0 + 20.0 * (difficulty / 100.0)
}

/// Expected response time for an item: `-9.48 + 18.03 * exp(0.0392 * b)`.
pub fn reference_time(difficulty: f64) -> f64 {
    REF_TIME_OFFSET + REF_TIME_SCALE * (REF_TIME_RATE * difficulty).exp()
}

/// Probability of a correct guess: `0.25 - 0.15 * (b / 100)`.
///
/// Not clamped. Difficulties outside `[0, 100]` produce floors outside
/// `[0.1, 0.25]`, and far enough out, outside `[0, 1)`.
pub fn guessing_floor(difficulty: f64) -> f64 {
    0.25 - 0.15 * (difficulty / 100.0)
}

/// Time-adjusted slope: `base_slope(b) * (ln(T + 1) / ln(reference_time(b) + 1))^2`.
///
/// `T == 0` is valid and yields a zero slope.
pub fn effective_slope(difficulty: f64, response_time: f64) -> Result<f64, ModelDomainError> {
    if !difficulty.is_finite() {
        return Err(ModelDomainError::NonFiniteDifficulty { difficulty });
    }
    if !response_time.is_finite() || response_time < 0.0 {
        return Err(ModelDomainError::InvalidResponseTime { response_time });
    }

    let reference = reference_time(difficulty);
    if reference + 1.0 <= 0.0 {
        return Err(ModelDomainError::UndefinedReferenceLog {
            difficulty,
            reference_time: reference,
        });
    }
    let denominator = (reference + 1.0).ln();
    if denominator == 0.0 {
        return Err(ModelDomainError::DegenerateReferenceTime { difficulty });
    }

    let ratio = (response_time + 1.0).ln() / denominator;
    let value = base_slope(difficulty) * ratio.powi(2);
    if !value.is_finite() || value < 0.0 {
        return Err(ModelDomainError::NonFiniteSlope {
            difficulty,
            response_time,
            value,
        });
    }
    Ok(value)
}

/// Derived parameters for one (difficulty, response time) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemParameters {
    /// Steepness of the logistic response curve.
    pub effective_slope: f64,
    /// Lower asymptote of the response curve.
    pub guessing_floor: f64,
}

impl ItemParameters {
    /// Derive the parameters, failing fast where the slope is undefined.
    pub fn derive(difficulty: f64, response_time: f64) -> Result<Self, ModelDomainError> {
        Ok(Self {
            effective_slope: effective_slope(difficulty, response_time)?,
            guessing_floor: guessing_floor(difficulty),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn parameters_at_difficulty_25() {
        assert!(close(base_slope(25.0), 11.0, 1e-12));
        assert!(close(guessing_floor(25.0), 0.2125, 1e-12));
        let expected_ref = -9.48 + 18.03 * 0.98f64.exp();
        assert!(close(reference_time(25.0), expected_ref, 1e-12));
        assert!(close(reference_time(25.0), 38.560146, 1e-5));
    }

    #[test]
    fn effective_slope_matches_formula() {
        let slope = effective_slope(25.0, 30.0).unwrap();
        let expected = 11.0 * (31.0f64.ln() / (reference_time(25.0) + 1.0).ln()).powi(2);
        assert!(close(slope, expected, 1e-12));
        assert!(close(slope, 9.589778, 1e-5), "got {slope}");
    }

    #[test]
    fn zero_response_time_gives_zero_slope() {
        assert_eq!(effective_slope(25.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn guessing_floor_is_not_clamped() {
        assert!(close(guessing_floor(200.0), -0.05, 1e-12));
        assert!(close(guessing_floor(-100.0), 0.4, 1e-12));
    }

    #[test]
    fn rejects_negative_or_non_finite_time() {
        assert!(matches!(
            effective_slope(25.0, -1.0),
            Err(ModelDomainError::InvalidResponseTime { .. })
        ));
        assert!(matches!(
            effective_slope(25.0, f64::NAN),
            Err(ModelDomainError::InvalidResponseTime { .. })
        ));
        assert!(matches!(
            effective_slope(f64::INFINITY, 3.0),
            Err(ModelDomainError::NonFiniteDifficulty { .. })
        ));
    }

    #[test]
    fn rejects_difficulty_below_reference_log_domain() {
        // reference_time(b) + 1 <= 0 below b ≈ -19.24
        let err = effective_slope(-40.0, 10.0).unwrap_err();
        assert!(matches!(err, ModelDomainError::UndefinedReferenceLog { .. }));
    }

    #[test]
    fn rejects_zero_reference_time() {
        // Solve reference_time(b) == 0 exactly enough that ln(1 + r) rounds to zero.
        let b = (-REF_TIME_OFFSET / REF_TIME_SCALE).ln() / REF_TIME_RATE;
        let reference = reference_time(b);
        assert!(reference.abs() < 1e-12, "reference = {reference}");
        let result = effective_slope(b, 10.0);
        if (reference + 1.0).ln() == 0.0 {
            assert!(matches!(
                result,
                Err(ModelDomainError::DegenerateReferenceTime { .. })
            ));
        } else {
            // Near-zero denominator explodes the slope instead.
            assert!(result.map(|s| s > 1e6).unwrap_or(true));
        }
    }

    #[test]
    fn derive_bundles_both_parameters() {
        let params = ItemParameters::derive(50.0, 20.0).unwrap();
        assert!(close(params.guessing_floor, 0.175, 1e-12));
        assert!(params.effective_slope > 0.0);
    }
}
