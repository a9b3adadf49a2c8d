//! Error types for the rating core and its input boundary.
//!
//! Domain failures are typed so the CLI can report which observation broke
//! and callers can inspect the partial trace without string matching.

use thiserror::Error;

use crate::model::{Observation, RatingTrace};

/// A derived item parameter is mathematically undefined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelDomainError {
    /// Response time must be a finite, non-negative number.
    #[error("response time {response_time} must be finite and non-negative")]
    InvalidResponseTime { response_time: f64 },

    /// Difficulty must be a finite number.
    #[error("difficulty {difficulty} is not finite")]
    NonFiniteDifficulty { difficulty: f64 },

    /// `log(reference_time + 1)` is undefined.
    #[error(
        "reference time {reference_time} for difficulty {difficulty} leaves log(reference_time + 1) undefined"
    )]
    UndefinedReferenceLog { difficulty: f64, reference_time: f64 },

    /// `log(reference_time + 1)` is zero, so the slope ratio divides by zero.
    #[error("reference time for difficulty {difficulty} is zero; effective slope divides by log(1)")]
    DegenerateReferenceTime { difficulty: f64 },

    /// The effective slope came out NaN, infinite or negative.
    #[error(
        "effective slope {value} for difficulty {difficulty} and response time {response_time} is not a valid slope"
    )]
    NonFiniteSlope {
        difficulty: f64,
        response_time: f64,
        value: f64,
    },
}

/// A step of the sequential tracker failed.
///
/// Carries the ratings completed before the failure so callers can choose
/// between aborting and reporting the partial trace.
#[derive(Debug, Clone, Error)]
#[error("observation {index} ({observation}) failed from prior rating {prior}: {source}")]
pub struct RatingError {
    /// Zero-based position of the failing observation.
    pub index: usize,
    /// The observation that could not be processed.
    pub observation: Observation,
    /// The estimate the failing step started from.
    pub prior: f64,
    #[source]
    pub source: ModelDomainError,
    /// Every step that succeeded before the failure.
    pub completed: RatingTrace,
}

/// A malformed input record rejected before it reaches the estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidObservationError {
    /// A required column is absent from the header.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A row has fewer fields than the header requires.
    #[error("line {line}: expected at least {expected} columns, got {got}")]
    ColumnCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// A field could not be coerced to its expected type.
    #[error("line {line}: invalid value '{value}' for field '{field}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The input has no header row at all.
    #[error("input has no header row")]
    MissingHeader,
}

/// Invalid estimator configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("sigma must be positive, got {0}")]
    NonPositiveSigma(f64),

    #[error("grid step must be positive, got {0}")]
    NonPositiveStep(f64),

    #[error("grid lower bound {lower} must be below upper bound {upper}")]
    EmptyGrid { lower: f64, upper: f64 },

    #[error("initial prior {prior} lies outside the grid [{lower}, {upper}]")]
    PriorOutsideGrid { prior: f64, lower: f64, upper: f64 },

    #[error("grid step is too fine: {points:e} candidates, at most {max} allowed")]
    GridTooFine { points: f64, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_error_message_names_step() {
        let err = RatingError {
            index: 3,
            observation: Observation::new(true, -16.4, 5.0),
            prior: 27.5,
            source: ModelDomainError::DegenerateReferenceTime { difficulty: -16.4 },
            completed: RatingTrace::new(25.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("observation 3"), "got: {msg}");
        assert!(msg.contains("27.5"), "got: {msg}");
        assert!(msg.contains("log(1)"), "got: {msg}");
    }

    #[test]
    fn invalid_value_message() {
        let err = InvalidObservationError::InvalidValue {
            line: 4,
            field: "T",
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "line 4: invalid value 'soon' for field 'T'");
    }
}
