//! Variational posterior estimators over simulator parameters.
//!
//! Purpose
//! -------
//! Define the capability set required of a variational family (differentiable
//! reparameterised sampling, log-density evaluation, and trainable-parameter
//! exposure) together with the concrete `TrainableGaussian` family used for
//! low-dimensional calibration problems.
//!
//! Conventions
//! -----------
//! - A posterior estimator owns both its trainable parameter vector and the
//!   matching gradient buffer; backward hooks add into the buffer and never
//!   clear it, so distinct differentiation paths can accumulate in sequence.
//! - Reparameterised draws record the standard-normal noise used to produce
//!   them in a [`SampleBatch`]; that recorded noise is the tape that the
//!   backward hooks replay.

pub mod errors;
pub mod gaussian;
pub mod traits;

pub use errors::{PosteriorError, PosteriorResult};
pub use gaussian::TrainableGaussian;
pub use traits::{PosteriorEstimator, SampleBatch};
