//! Prior distributions over simulator parameters.
//!
//! A prior only needs log-density evaluation, plus the gradient of the
//! log-density with respect to the evaluation point: the score term used by
//! the pathwise gradient of the divergence estimate in `regularisation`.

pub mod errors;
pub mod normal;

pub use errors::{PriorError, PriorResult};
pub use normal::IndependentNormal;

use ndarray::{Array1, ArrayView1};

/// Capability set required of a prior distribution.
pub trait PriorDistribution {
    /// Dimension of the parameter space the prior is defined over.
    fn dim(&self) -> usize;

    /// Log-density of the point `x` (length `dim`).
    fn log_prob(&self, x: ArrayView1<'_, f64>) -> f64;

    /// Gradient of `log_prob` with respect to the point `x`.
    fn grad_log_prob(&self, x: ArrayView1<'_, f64>) -> Array1<f64>;
}
