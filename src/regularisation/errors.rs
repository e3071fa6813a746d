//! Error types for the regularisation engine.
use crate::posterior::errors::PosteriorError;
use std::error::Error;
use std::fmt;

/// Convenience alias for regularisation computations.
pub type RegularisationResult<T> = Result<T, RegularisationError>;

/// Failure modes of the divergence estimate and its backward pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RegularisationError {
    /// Posterior and prior are defined over spaces of different dimension.
    DimMismatch { posterior: usize, prior: usize },

    /// The sample batch holds no rows, so no Monte-Carlo estimate exists.
    EmptyBatch,

    /// A backward hook on the posterior rejected its inputs.
    Posterior(PosteriorError),
}

impl fmt::Display for RegularisationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegularisationError::DimMismatch { posterior, prior } => write!(
                f,
                "posterior dimension {posterior} does not match prior dimension {prior}"
            ),
            RegularisationError::EmptyBatch => {
                write!(f, "regularisation requires at least one sample")
            }
            RegularisationError::Posterior(err) => write!(f, "posterior backward failed: {err}"),
        }
    }
}

impl Error for RegularisationError {}

impl From<PosteriorError> for RegularisationError {
    fn from(err: PosteriorError) -> Self {
        RegularisationError::Posterior(err)
    }
}
