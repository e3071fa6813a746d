/// Result alias for optimizer construction.
pub type OptimResult<T> = Result<T, OptimError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptimError {
    /// Learning rate must be finite and strictly positive.
    InvalidLearningRate {
        value: f64,
    },

    /// Moment-decay coefficients must lie in [0, 1).
    InvalidBeta {
        value: f64,
    },

    /// Numerical-stability epsilon must be finite and strictly positive.
    InvalidEpsilon {
        value: f64,
    },
}

impl std::error::Error for OptimError {}

impl std::fmt::Display for OptimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimError::InvalidLearningRate { value } => {
                write!(f, "Invalid learning rate {value}: must be finite and > 0")
            }
            OptimError::InvalidBeta { value } => {
                write!(f, "Invalid moment decay {value}: must lie in [0, 1)")
            }
            OptimError::InvalidEpsilon { value } => {
                write!(f, "Invalid epsilon {value}: must be finite and > 0")
            }
        }
    }
}
