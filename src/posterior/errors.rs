/// Result alias for posterior-estimator operations.
pub type PosteriorResult<T> = Result<T, PosteriorError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PosteriorError {
    /// The mean vector must be non-empty.
    EmptyMean,

    /// Mean entries must be finite.
    InvalidMean {
        index: usize,
        value: f64,
    },

    /// Scale must be finite and strictly positive.
    InvalidSigma {
        value: f64,
        reason: &'static str,
    },

    /// Scale floor must be finite and strictly positive.
    InvalidSigmaFloor {
        value: f64,
    },

    /// Trainable-parameter vector length does not match the estimator.
    ParamLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// A point passed to a density routine has the wrong dimension.
    PointDimMismatch {
        expected: usize,
        actual: usize,
    },

    /// A sample batch and its noise tape (or a cotangent matrix) disagree in
    /// shape.
    BatchShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl std::error::Error for PosteriorError {}

impl std::fmt::Display for PosteriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PosteriorError::EmptyMean => {
                write!(f, "Posterior mean vector must be non-empty")
            }
            PosteriorError::InvalidMean { index, value } => {
                write!(f, "Invalid posterior mean at index {index}: {value}, must be finite")
            }
            PosteriorError::InvalidSigma { value, reason } => {
                write!(f, "Invalid posterior scale {value}: {reason}")
            }
            PosteriorError::InvalidSigmaFloor { value } => {
                write!(f, "Invalid scale floor {value}: must be finite and strictly positive")
            }
            PosteriorError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, actual {actual}")
            }
            PosteriorError::PointDimMismatch { expected, actual } => {
                write!(f, "Point dimension mismatch: expected {expected}, actual {actual}")
            }
            PosteriorError::BatchShapeMismatch { expected, actual } => {
                write!(f, "Batch shape mismatch: expected {expected:?}, actual {actual:?}")
            }
        }
    }
}
