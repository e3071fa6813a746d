//! gvi_calibrate: generalised variational inference for simulator calibration.
//!
//! Purpose
//! -------
//! Calibrate the parameters of a (possibly non-differentiable or stochastic)
//! simulator against observed time-series data by fitting a variational
//! posterior distribution over the parameters. The fitted posterior minimizes
//! a forecast-reconstruction loss between simulated and observed outputs
//! while staying regularised toward a prior, with simulator sensitivities
//! obtained by finite differences under common random numbers.
//!
//! Key behaviors
//! -------------
//! - `calibration::Calibrator` orchestrates each training step: draw
//!   reparameterised samples from the posterior estimator, score them through
//!   the simulator, estimate the posterior-to-prior divergence, and combine
//!   both gradient paths into one optimisation update.
//! - `forecast` evaluates the forecast loss and the per-sample Jacobian of
//!   the simulator loss with respect to the sampled parameters.
//! - `regularisation` produces a Monte-Carlo divergence estimate together
//!   with its gradient-accumulating backward pass.
//! - `posterior`, `prior`, and `models` provide the distribution and
//!   simulator implementations consumed through narrow trait interfaces.
//! - `optim` supplies the adaptive-moment optimizer and global-norm gradient
//!   clipping used by the training loop.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical state is `ndarray` containers over `f64`.
//! - Posterior scale parameters are stored raw and read through a clamped
//!   view; computations never observe a scale below the configured floor.
//! - A training step performs exactly one optimizer update; steps are never
//!   reentrant and are invoked strictly sequentially by the training loop.
//!
//! Conventions
//! -----------
//! - Observed data and simulator outputs are lists of one-dimensional series
//!   with matching shapes.
//! - Errors are typed per module and converted into `calibration::errors`
//!   variants at the orchestration boundary; collaborator failures propagate
//!   to the caller unmodified.
//! - Progress output is structured `tracing` events, gated to the designated
//!   reporting process in multi-process deployments.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; end-to-end calibration behavior
//!   (random-walk recovery, regularisation dominance, early stopping) is
//!   covered by the integration suite under `tests/`.

pub mod calibration;
pub mod forecast;
pub mod models;
pub mod optim;
pub mod posterior;
pub mod prior;
pub mod regularisation;
