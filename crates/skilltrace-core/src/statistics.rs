//! Summary statistics over a rating trace.

use serde::{Deserialize, Serialize};

use crate::model::RatingTrace;

/// Aggregate view of one tracked session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Number of processed observations.
    pub attempts: usize,
    /// Number of correct observations.
    pub correct: usize,
    /// Fraction of correct observations (0 for an empty trace).
    pub accuracy: f64,
    /// Prior before the first observation.
    pub initial_rating: f64,
    /// Rating after the last observation.
    pub final_rating: f64,
    /// Highest rating reached, including the initial prior.
    pub peak_rating: f64,
    /// Lowest rating reached, including the initial prior.
    pub lowest_rating: f64,
    /// `final_rating - initial_rating`.
    pub net_change: f64,
    /// Mean item difficulty (0 for an empty trace).
    pub mean_difficulty: f64,
    /// Mean response time (0 for an empty trace).
    pub mean_response_time: f64,
}

impl TraceSummary {
    pub fn compute(trace: &RatingTrace) -> Self {
        let attempts = trace.len();
        let correct = trace.iter().filter(|p| p.observation.correct).count();

        let initial = trace.initial_prior;
        let (lowest, peak) = trace
            .iter()
            .map(|p| p.rating)
            .fold((initial, initial), |(lo, hi), r| (lo.min(r), hi.max(r)));
        let final_rating = trace.current();

        Self {
            attempts,
            correct,
            accuracy: if attempts == 0 {
                0.0
            } else {
                correct as f64 / attempts as f64
            },
            initial_rating: initial,
            final_rating,
            peak_rating: peak,
            lowest_rating: lowest,
            net_change: final_rating - initial,
            mean_difficulty: mean(trace.iter().map(|p| p.observation.difficulty)),
            mean_response_time: mean(trace.iter().map(|p| p.observation.response_time)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;

    #[test]
    fn empty_trace_summary() {
        let summary = TraceSummary::compute(&RatingTrace::new(25.0));
        assert_eq!(summary.attempts, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert_eq!(summary.final_rating, 25.0);
        assert_eq!(summary.peak_rating, 25.0);
        assert_eq!(summary.net_change, 0.0);
    }

    #[test]
    fn summary_tracks_extremes_and_means() {
        let mut trace = RatingTrace::new(25.0);
        trace.push(Observation::new(true, 30.0, 10.0), 26.0);
        trace.push(Observation::new(false, 50.0, 30.0), 24.0);
        trace.push(Observation::new(true, 40.0, 20.0), 25.5);

        let summary = TraceSummary::compute(&trace);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.correct, 2);
        assert!((summary.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.peak_rating, 26.0);
        assert_eq!(summary.lowest_rating, 24.0);
        assert_eq!(summary.final_rating, 25.5);
        assert!((summary.net_change - 0.5).abs() < 1e-12);
        assert!((summary.mean_difficulty - 40.0).abs() < 1e-12);
        assert!((summary.mean_response_time - 20.0).abs() < 1e-12);
    }
}
