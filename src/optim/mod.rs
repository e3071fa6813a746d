//! First-order optimizers and gradient hygiene for the calibration loop.
//!
//! The calibration step computes gradients into the posterior estimator's
//! buffer itself (two backward accumulations), so an optimizer here is just
//! the update rule: given the current trainable vector and its gradient,
//! mutate the vector in place. Optimizers carry their own internal state
//! (moment estimates, step counters) across calls.

pub mod adam;
pub mod clip;
pub mod errors;

pub use adam::Adam;
pub use clip::clip_global_norm;
pub use errors::{OptimError, OptimResult};

use crate::posterior::traits::Theta;
use ndarray::ArrayView1;

/// Update rule applied once per training step.
pub trait Optimizer {
    /// Apply one update to `params` given `grads`. Implementations mutate
    /// their internal state (momentum, step count) as a side effect.
    fn step(&mut self, params: &mut Theta, grads: ArrayView1<'_, f64>);
}
