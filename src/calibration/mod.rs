//! Training loop for variational simulator calibration.
//!
//! The calibrator glues the other modules together: it samples parameters
//! from the posterior, scores them through the `forecast` engine, estimates
//! the prior divergence through `regularisation`, accumulates both gradient
//! paths into the posterior's buffer, and drives an `optim` optimizer over
//! multiple epochs with early stopping and structured progress events.
pub mod calibrator;
pub mod errors;
pub mod options;
pub mod patience;
mod report;

pub use calibrator::{Calibrator, LossTriple, RunOutcome};
pub use errors::{CalibrationError, CalibrationResult};
pub use options::CalibratorOptions;
pub use patience::Patience;
