//! Core trait definitions for skilltrace.
//!
//! The tracker is generic over how a single loss surface is minimised so the
//! exhaustive grid can be swapped for another optimiser over the same interval.

/// Finds the ability value minimising a one-dimensional loss.
pub trait Minimizer: Send + Sync {
    /// Return the minimiser of `loss`.
    ///
    /// `seed` is evaluated first and is kept unless a candidate scores
    /// strictly lower.
    fn minimize(&self, seed: f64, loss: &dyn Fn(f64) -> f64) -> f64;

    /// Inclusive interval the minimiser searches.
    fn bounds(&self) -> (f64, f64);
}

impl<M: Minimizer + ?Sized> Minimizer for Box<M> {
    fn minimize(&self, seed: f64, loss: &dyn Fn(f64) -> f64) -> f64 {
        (**self).minimize(seed, loss)
    }

    fn bounds(&self) -> (f64, f64) {
        (**self).bounds()
    }
}
