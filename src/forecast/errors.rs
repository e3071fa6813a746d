use crate::models::errors::ModelError;

/// Result alias for forecast-engine operations.
pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Simulated and observed outputs have different numbers of series.
    SeriesCountMismatch {
        expected: usize,
        actual: usize,
    },

    /// A simulated series and its observed counterpart differ in length.
    SeriesLengthMismatch {
        series: usize,
        expected: usize,
        actual: usize,
    },

    /// Every drawn sample produced a non-finite loss; no forecast gradient
    /// can be formed.
    NoFiniteSamples {
        n_samples: usize,
    },

    /// Failure raised by the simulator model.
    Model(ModelError),
}

impl std::error::Error for ForecastError {}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::SeriesCountMismatch { expected, actual } => {
                write!(f, "Series count mismatch: expected {expected}, actual {actual}")
            }
            ForecastError::SeriesLengthMismatch { series, expected, actual } => {
                write!(
                    f,
                    "Series {series} length mismatch: expected {expected}, actual {actual}"
                )
            }
            ForecastError::NoFiniteSamples { n_samples } => {
                write!(f, "All {n_samples} samples produced non-finite forecast losses")
            }
            ForecastError::Model(err) => {
                write!(f, "Simulator failure: {err}")
            }
        }
    }
}

impl From<ModelError> for ForecastError {
    fn from(err: ModelError) -> Self {
        ForecastError::Model(err)
    }
}
