//! Capability interface for variational posterior families.
//!
//! Purpose
//! -------
//! Specify what the calibration loop needs from a variational family:
//! reparameterised sampling that records its noise tape, plain
//! (non-differentiable) sampling, log-density evaluation with gradients, and
//! exposure of the trainable-parameter and gradient buffers so an optimizer
//! can be bound to them.
//!
//! Key behaviors
//! -------------
//! - [`SampleBatch`] pairs drawn parameter values with the standard-normal
//!   noise that produced them; the noise is the recorded tape replayed by
//!   [`PosteriorEstimator::backward_rsample`].
//! - Backward hooks accumulate additively into the estimator's single
//!   gradient buffer and never clear it. Both differentiation paths of the
//!   calibration objective (forecast and regularisation) add into the same
//!   buffer in sequence.
//!
//! Conventions
//! -----------
//! - `dim` is the dimension of the simulator parameter space; the trainable
//!   vector may be longer (e.g. means plus scales).
//! - Cotangent matrices are row-per-sample, matching the layout of
//!   `SampleBatch::values`.
use crate::posterior::errors::{PosteriorError, PosteriorResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;

/// Trainable-parameter vector in unconstrained storage space.
pub type Theta = Array1<f64>;
/// Gradient with respect to [`Theta`].
pub type Grad = Array1<f64>;

/// A batch of reparameterised parameter draws with its recorded noise tape.
///
/// Row `i` of `values` is the `i`-th sampled simulator parameter vector; row
/// `i` of `noise` holds the standard-normal draws that were pushed through
/// the reparameterisation to produce it. Both matrices always share one
/// shape; the constructor rejects mismatched pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    values: Array2<f64>,
    noise: Array2<f64>,
}

impl SampleBatch {
    /// Pair drawn values with their noise tape, checking the shapes agree.
    pub fn new(values: Array2<f64>, noise: Array2<f64>) -> PosteriorResult<Self> {
        if values.dim() != noise.dim() {
            return Err(PosteriorError::BatchShapeMismatch {
                expected: values.dim(),
                actual: noise.dim(),
            });
        }
        Ok(SampleBatch { values, noise })
    }

    /// A batch with zero samples over a `dim`-dimensional parameter space.
    pub fn empty(dim: usize) -> Self {
        SampleBatch { values: Array2::zeros((0, dim)), noise: Array2::zeros((0, dim)) }
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of each sampled parameter vector.
    pub fn dim(&self) -> usize {
        self.values.ncols()
    }

    /// Drawn parameter values, one row per sample.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Recorded standard-normal noise, one row per sample.
    pub fn noise(&self) -> ArrayView2<'_, f64> {
        self.noise.view()
    }
}

/// Capability set required of a variational posterior family.
///
/// The estimator owns its trainable parameters and the matching gradient
/// buffer. The calibration step clears the buffer once, then runs two
/// backward accumulations (forecast path, then regularisation path) before
/// handing the buffer to the optimizer.
///
/// Required capabilities:
/// - `rsample`: differentiable draws recording their noise tape.
/// - `sample`: plain draws with no tape.
/// - `log_prob` / `grad_log_prob_x`: log-density and its gradient with
///   respect to the evaluation point (the score needed by pathwise
///   divergence gradients).
/// - `backward_log_prob`: accumulate `cotangent · ∂log q(x)/∂λ` into the
///   gradient buffer, where `λ` is the trainable vector.
/// - `backward_rsample`: accumulate the backward of `Σ_i ⟨c_i, θ_i⟩` through
///   the reparameterised sampling operation, where `c_i` is the cotangent
///   row for sample `i`.
pub trait PosteriorEstimator {
    /// Dimension of the simulator parameter space.
    fn dim(&self) -> usize;

    /// Length of the trainable-parameter vector.
    fn n_trainable(&self) -> usize;

    /// Trainable parameters in storage space.
    fn params(&self) -> ArrayView1<'_, f64>;

    /// Overwrite the trainable parameters (e.g. restoring a best-state
    /// snapshot). Fails on length mismatch.
    fn set_params(&mut self, values: ArrayView1<'_, f64>) -> PosteriorResult<()>;

    /// Mutable access to the trainable parameters for the optimizer update.
    fn params_mut(&mut self) -> &mut Theta;

    /// Accumulated gradient with respect to the trainable parameters.
    fn grad(&self) -> ArrayView1<'_, f64>;

    /// Mutable access to the gradient buffer (e.g. for norm clipping).
    fn grad_mut(&mut self) -> &mut Grad;

    /// Clear the gradient buffer to zero.
    fn zero_grad(&mut self);

    /// Draw `n` reparameterised samples, recording the noise tape.
    fn rsample(&self, n: usize, rng: &mut StdRng) -> SampleBatch;

    /// Draw `n` samples with no gradient tape.
    fn sample(&self, n: usize, rng: &mut StdRng) -> Array2<f64>;

    /// Log-density of the point `x` (length `dim`) under the current
    /// parameters. Non-finite parameters yield non-finite values rather than
    /// errors; downstream masking handles them.
    fn log_prob(&self, x: ArrayView1<'_, f64>) -> f64;

    /// Gradient of `log_prob` with respect to the point `x`.
    fn grad_log_prob_x(&self, x: ArrayView1<'_, f64>) -> Array1<f64>;

    /// Accumulate `cotangent · ∂log q(x)/∂λ` into the gradient buffer.
    fn backward_log_prob(&mut self, x: ArrayView1<'_, f64>, cotangent: f64)
        -> PosteriorResult<()>;

    /// Accumulate the backward of `Σ_i ⟨c_i, θ_i⟩` through the
    /// reparameterisation, with `cotangents` row `i` as `c_i`.
    fn backward_rsample(
        &mut self, batch: &SampleBatch, cotangents: ArrayView2<'_, f64>,
    ) -> PosteriorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify that `SampleBatch::new` accepts matching value/noise shapes and
    // exposes the expected dimensions.
    fn sample_batch_accepts_matching_shapes() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let noise = array![[0.1, 0.2], [0.3, 0.4]];
        let batch = SampleBatch::new(values, noise).expect("matching shapes should construct");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.dim(), 2);
        assert!(!batch.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure mismatched value/noise shapes are rejected with the typed error.
    fn sample_batch_rejects_shape_mismatch() {
        let values = array![[1.0, 2.0]];
        let noise = array![[0.1], [0.2]];
        let err = SampleBatch::new(values, noise).unwrap_err();
        match err {
            PosteriorError::BatchShapeMismatch { expected, actual } => {
                assert_eq!(expected, (1, 2));
                assert_eq!(actual, (2, 1));
            }
            other => panic!("expected BatchShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_batch_has_zero_samples() {
        let batch = SampleBatch::empty(3);
        assert!(batch.is_empty());
        assert_eq!(batch.dim(), 3);
    }
}
