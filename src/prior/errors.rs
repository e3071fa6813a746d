/// Result alias for prior-distribution construction.
pub type PriorResult<T> = Result<T, PriorError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PriorError {
    /// The mean vector must be non-empty.
    Empty,

    /// Mean and scale vectors must have the same length.
    LengthMismatch {
        means: usize,
        sigmas: usize,
    },

    /// Mean entries must be finite.
    InvalidMean {
        index: usize,
        value: f64,
    },

    /// Scale entries must be finite and strictly positive.
    InvalidScale {
        index: usize,
        value: f64,
    },
}

impl std::error::Error for PriorError {}

impl std::fmt::Display for PriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorError::Empty => {
                write!(f, "Prior mean vector must be non-empty")
            }
            PriorError::LengthMismatch { means, sigmas } => {
                write!(f, "Prior mean/scale length mismatch: {means} means, {sigmas} scales")
            }
            PriorError::InvalidMean { index, value } => {
                write!(f, "Invalid prior mean at index {index}: {value}, must be finite")
            }
            PriorError::InvalidScale { index, value } => {
                write!(
                    f,
                    "Invalid prior scale at index {index}: {value}, must be finite and > 0"
                )
            }
        }
    }
}
