//! Core data model types for skilltrace.
//!
//! An [`Observation`] is one timed attempt at an item; a [`RatingTrace`] is
//! the ordered record of ratings produced by feeding observations through
//! the estimator one at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One attempt at an item: correctness, item difficulty and response time.
///
/// Field names on the wire follow the tabular input convention (`x`, `b`, `T`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Whether the attempt was answered correctly.
    #[serde(rename = "x", with = "correctness")]
    pub correct: bool,
    /// Item difficulty, nominally on the same 0–100 scale as the rating.
    #[serde(rename = "b")]
    pub difficulty: f64,
    /// Elapsed time for the attempt.
    #[serde(rename = "T")]
    pub response_time: f64,
}

impl Observation {
    pub fn new(correct: bool, difficulty: f64, response_time: f64) -> Self {
        Self {
            correct,
            difficulty,
            response_time,
        }
    }

    /// Correctness as the 0/1 indicator used in the likelihood.
    pub fn indicator(&self) -> f64 {
        if self.correct {
            1.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}, b={}, T={}",
            u8::from(self.correct),
            self.difficulty,
            self.response_time
        )
    }
}

/// Correctness is written as `0`/`1` and read from `0`/`1` or `true`/`false`.
mod correctness {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Int(0) => Ok(false),
            Raw::Int(1) => Ok(true),
            Raw::Float(f) if f == 0.0 => Ok(false),
            Raw::Float(f) if f == 1.0 => Ok(true),
            Raw::Int(other) => Err(D::Error::custom(format!(
                "correctness must be 0 or 1, got {other}"
            ))),
            Raw::Float(other) => Err(D::Error::custom(format!(
                "correctness must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// A single processed observation and the rating it produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    /// Zero-based attempt index.
    pub index: usize,
    /// The observation fed to the estimator.
    pub observation: Observation,
    /// The estimate this step started from.
    pub prior: f64,
    /// The estimate after this observation.
    pub rating: f64,
}

/// Append-only, ordered record of estimates.
///
/// Point `i` was computed from observation `i` and the rating of point
/// `i - 1` (or the initial prior for `i == 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTrace {
    /// Prior used for the first observation.
    pub initial_prior: f64,
    /// Processed observations, in input order.
    #[serde(default)]
    pub points: Vec<RatingPoint>,
}

impl RatingTrace {
    pub fn new(initial_prior: f64) -> Self {
        Self {
            initial_prior,
            points: Vec::new(),
        }
    }

    /// The estimate the next observation will start from.
    pub fn current(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.rating)
            .unwrap_or(self.initial_prior)
    }

    /// Record the rating produced by `observation`, chained onto the current estimate.
    pub fn push(&mut self, observation: Observation, rating: f64) {
        let point = RatingPoint {
            index: self.points.len(),
            observation,
            prior: self.current(),
            rating,
        };
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ratings only, one per processed observation.
    pub fn ratings(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rating).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RatingPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a RatingTrace {
    type Item = &'a RatingPoint;
    type IntoIter = std::slice::Iter<'a, RatingPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
