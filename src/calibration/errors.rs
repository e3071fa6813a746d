//! Error types for calibrator construction, configuration, and training.
use crate::forecast::errors::ForecastError;
use crate::posterior::errors::PosteriorError;
use crate::regularisation::errors::RegularisationError;
use std::error::Error;
use std::fmt;

/// Convenience alias for calibration computations.
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Failure modes of calibrator setup and the training loop.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Regularisation weight must be finite and non-negative.
    InvalidWeight { value: f64 },

    /// Clipping threshold must be positive (infinity disables clipping).
    InvalidClippingNorm { value: f64 },

    /// A bounded patience must allow at least one stale epoch.
    InvalidPatience,

    /// The divergence estimate needs at least one sample.
    InvalidRegularisationSamples,

    /// Simulator parameter count does not match the posterior dimension.
    ModelDimMismatch { model: usize, posterior: usize },

    /// Prior dimension does not match the posterior dimension.
    PriorDimMismatch { prior: usize, posterior: usize },

    /// The forecast engine failed.
    Forecast(ForecastError),

    /// The regularisation engine failed.
    Regularisation(RegularisationError),

    /// A posterior operation rejected its inputs.
    Posterior(PosteriorError),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::InvalidWeight { value } => {
                write!(f, "regularisation weight must be finite and >= 0, got {value}")
            }
            CalibrationError::InvalidClippingNorm { value } => {
                write!(f, "gradient clipping norm must be positive, got {value}")
            }
            CalibrationError::InvalidPatience => {
                write!(f, "bounded patience must allow at least one epoch")
            }
            CalibrationError::InvalidRegularisationSamples => {
                write!(f, "regularisation sample count must be at least 1")
            }
            CalibrationError::ModelDimMismatch { model, posterior } => write!(
                f,
                "simulator expects {model} parameters but the posterior has dimension {posterior}"
            ),
            CalibrationError::PriorDimMismatch { prior, posterior } => write!(
                f,
                "prior dimension {prior} does not match posterior dimension {posterior}"
            ),
            CalibrationError::Forecast(err) => write!(f, "forecast evaluation failed: {err}"),
            CalibrationError::Regularisation(err) => {
                write!(f, "regularisation evaluation failed: {err}")
            }
            CalibrationError::Posterior(err) => write!(f, "posterior operation failed: {err}"),
        }
    }
}

impl Error for CalibrationError {}

impl From<ForecastError> for CalibrationError {
    fn from(err: ForecastError) -> Self {
        CalibrationError::Forecast(err)
    }
}

impl From<RegularisationError> for CalibrationError {
    fn from(err: RegularisationError) -> Self {
        CalibrationError::Regularisation(err)
    }
}

impl From<PosteriorError> for CalibrationError {
    fn from(err: PosteriorError) -> Self {
        CalibrationError::Posterior(err)
    }
}
