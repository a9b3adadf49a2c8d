//! Grid-search estimator.
//!
//! Enumerates every candidate on a fixed grid, scores them all, then reduces
//! to the first strict minimum. Candidates are independent of each other, so
//! the scoring pass has no ordering dependency.

use crate::config::EstimatorConfig;
use crate::error::{ConfigError, ModelDomainError};
use crate::loss::PosteriorLoss;
use crate::model::Observation;
use crate::traits::Minimizer;

/// Slack so `(upper - lower) / step` landing a hair under an integer still
/// includes the upper bound.
const GRID_SLACK: f64 = 1e-9;

/// Largest number of candidates a grid may hold.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Number of candidates `lower, lower + step, ..., upper` holds, as a float so
/// a tiny step cannot overflow.
pub fn grid_point_count(lower: f64, upper: f64, step: f64) -> f64 {
    ((upper - lower) / step + GRID_SLACK).floor() + 1.0
}

/// Exhaustive scan over `lower, lower + step, ..., upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearch {
    lower: f64,
    upper: f64,
    candidates: Vec<f64>,
}

impl GridSearch {
    pub fn new(lower: f64, upper: f64, step: f64) -> Result<Self, ConfigError> {
        for (field, value) in [("lower_bound", lower), ("upper_bound", upper), ("step", step)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if step <= 0.0 {
            return Err(ConfigError::NonPositiveStep(step));
        }
        if lower >= upper {
            return Err(ConfigError::EmptyGrid { lower, upper });
        }
        let points = grid_point_count(lower, upper, step);
        if points > MAX_GRID_POINTS as f64 {
            return Err(ConfigError::GridTooFine {
                points,
                max: MAX_GRID_POINTS,
            });
        }

        Ok(Self::build(lower, upper, step))
    }

    fn build(lower: f64, upper: f64, step: f64) -> Self {
        let points = grid_point_count(lower, upper, step) as usize;
        let candidates = (0..points)
            .map(|i| (lower + i as f64 * step).min(upper))
            .collect();

        Self {
            lower,
            upper,
            candidates,
        }
    }

    pub fn from_config(config: &EstimatorConfig) -> Result<Self, ConfigError> {
        Self::new(config.lower_bound, config.upper_bound, config.step)
    }

    /// Grid points in ascending order.
    pub fn candidates(&self) -> &[f64] {
        &self.candidates
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        let config = EstimatorConfig::default();
        Self::build(config.lower_bound, config.upper_bound, config.step)
    }
}

/// Reduce scored candidates to the first strict minimum, starting from `seed`.
///
/// Equal losses never replace the incumbent, so the seed beats every tie and
/// earlier candidates beat later ones.
pub fn argmin<I>(seed: (f64, f64), scored: I) -> (f64, f64)
where
    I: IntoIterator<Item = (f64, f64)>,
{
    scored.into_iter().fold(seed, |best, candidate| {
        if candidate.1 < best.1 {
            candidate
        } else {
            best
        }
    })
}

impl Minimizer for GridSearch {
    fn minimize(&self, seed: f64, loss: &dyn Fn(f64) -> f64) -> f64 {
        let scored: Vec<(f64, f64)> = self.candidates.iter().map(|&t| (t, loss(t))).collect();
        argmin((seed, loss(seed)), scored).0
    }

    fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

/// One update step: the rating that best explains `observation` given `prior`.
pub fn estimate<M: Minimizer + ?Sized>(
    minimizer: &M,
    prior: f64,
    sigma: f64,
    observation: &Observation,
) -> Result<f64, ModelDomainError> {
    let loss = PosteriorLoss::new(*observation, prior, sigma)?;
    Ok(minimizer.minimize(prior, &|theta| loss.evaluate(theta)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_grid_has_1001_points() {
        let grid = GridSearch::default();
        assert_eq!(grid.candidates().len(), 1001);
        assert_eq!(grid.candidates()[0], 0.0);
        assert!(close(grid.candidates()[1000], 100.0));
        assert_eq!(grid, GridSearch::new(0.0, 100.0, 0.1).unwrap());
    }

    #[test]
    fn grid_stays_inside_bounds() {
        let grid = GridSearch::new(10.0, 20.0, 0.3).unwrap();
        let last = *grid.candidates().last().unwrap();
        assert!(last <= 20.0);
        assert!(last > 19.6);
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(matches!(
            GridSearch::new(0.0, 100.0, 0.0),
            Err(ConfigError::NonPositiveStep(_))
        ));
        assert!(matches!(
            GridSearch::new(50.0, 50.0, 0.1),
            Err(ConfigError::EmptyGrid { .. })
        ));
        assert!(matches!(
            GridSearch::new(f64::NAN, 50.0, 0.1),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn rejects_grids_too_fine_to_allocate() {
        for step in [1e-300, 1e-9, 1e-5] {
            assert!(
                matches!(
                    GridSearch::new(0.0, 100.0, step),
                    Err(ConfigError::GridTooFine { max: MAX_GRID_POINTS, .. })
                ),
                "step={step}"
            );
        }
        let finest = GridSearch::new(0.0, 100.0, 1e-4).unwrap();
        assert_eq!(finest.candidates().len(), 1_000_001);
    }

    #[test]
    fn argmin_prefers_first_of_equal_losses() {
        let best = argmin((5.0, 1.0), vec![(1.0, 0.5), (2.0, 0.5), (3.0, 0.7)]);
        assert_eq!(best, (1.0, 0.5));
    }

    #[test]
    fn seed_survives_ties() {
        let grid = GridSearch::default();
        assert_eq!(grid.minimize(42.0, &|_| 1.0), 42.0);
    }

    #[test]
    fn off_grid_seed_wins_when_strictly_best() {
        let grid = GridSearch::default();
        let seed = 33.333;
        assert_eq!(grid.minimize(seed, &|t| (t - seed).abs()), seed);
    }

    #[test]
    fn finds_grid_minimum() {
        let grid = GridSearch::default();
        let best = grid.minimize(0.0, &|t| (t - 61.27).powi(2));
        assert!(close(best, 61.3), "got {best}");
    }

    #[test]
    fn golden_single_correct_response() {
        let grid = GridSearch::default();
        let rating = estimate(&grid, 25.0, 2.0, &Observation::new(true, 25.0, 30.0)).unwrap();
        assert!(close(rating, 25.1), "got {rating}");
    }

    #[test]
    fn golden_single_incorrect_response() {
        let grid = GridSearch::default();
        let rating = estimate(&grid, 25.0, 2.0, &Observation::new(false, 25.0, 30.0)).unwrap();
        assert!(close(rating, 24.8), "got {rating}");
    }

    #[test]
    fn estimate_stays_within_grid() {
        let grid = GridSearch::default();
        for prior in [0.0, 50.0, 100.0] {
            for obs in [
                Observation::new(true, 100.0, 1.0),
                Observation::new(false, 0.0, 90.0),
                Observation::new(true, 0.0, 0.0),
            ] {
                let rating = estimate(&grid, prior, 2.0, &obs).unwrap();
                assert!((0.0..=100.0).contains(&rating), "prior={prior} {obs} -> {rating}");
            }
        }
    }

    #[test]
    fn success_never_scores_below_failure() {
        let grid = GridSearch::default();
        for b in [0.0, 15.0, 25.0, 50.0, 80.0, 100.0] {
            for t in [0.0, 1.0, 10.0, 40.0, 200.0] {
                for prior in [0.0, 25.0, 75.0, 100.0] {
                    let pass = estimate(&grid, prior, 2.0, &Observation::new(true, b, t)).unwrap();
                    let fail = estimate(&grid, prior, 2.0, &Observation::new(false, b, t)).unwrap();
                    assert!(pass >= fail, "b={b} T={t} prior={prior}: {pass} < {fail}");
                }
            }
        }
    }

    #[test]
    fn zero_time_item_at_the_prior_keeps_the_rating() {
        let grid = GridSearch::default();
        let rating = estimate(&grid, 25.0, 2.0, &Observation::new(true, 25.0, 0.0)).unwrap();
        assert_eq!(rating, 25.0);
        let rating = estimate(&grid, 99.9, 2.0, &Observation::new(true, 100.0, 0.0)).unwrap();
        assert_eq!(rating, 99.9);
    }

    #[test]
    fn zero_time_item_never_lands_on_its_difficulty() {
        let grid = GridSearch::default();
        let rating = estimate(&grid, 20.0, 2.0, &Observation::new(true, 25.0, 0.0)).unwrap();
        assert!(close(rating, 20.2), "got {rating}");
        let rating = estimate(&grid, 30.0, 2.0, &Observation::new(false, 25.0, 0.0)).unwrap();
        assert!(close(rating, 24.9), "got {rating}");
    }

    #[test]
    fn domain_error_surfaces_before_scanning() {
        let grid = GridSearch::default();
        let err = estimate(&grid, 25.0, 2.0, &Observation::new(true, -40.0, 10.0)).unwrap_err();
        assert!(matches!(err, ModelDomainError::UndefinedReferenceLog { .. }));
    }
}
