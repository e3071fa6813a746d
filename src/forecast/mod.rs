//! Forecast-loss evaluation and simulator-Jacobian computation.
//!
//! Purpose
//! -------
//! Score a batch of sampled parameter vectors through the simulator against
//! observed data, and attach to each sample the Jacobian of its scalar loss
//! with respect to the parameters. The Jacobians are what lets the
//! calibration step route data-fit gradients back through a black-box
//! simulator: the simulator itself is never reverse-differentiated, only
//! probed by central finite differences under common random numbers.

pub mod errors;
pub mod jacobian;
pub mod loss;

pub use errors::{ForecastError, ForecastResult};
pub use jacobian::{compute_forecast_loss_and_jacobian, ForecastOutcome};
pub use loss::{ForecastLoss, MeanSquaredError};
