/// Result alias for simulator-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Parameter vector length does not match the model.
    ParamDimMismatch {
        expected: usize,
        actual: usize,
    },

    /// Parameter entries must be finite.
    NonFiniteParam {
        index: usize,
        value: f64,
    },

    /// Model configuration is invalid (e.g. zero timesteps, bad temperature).
    InvalidConfiguration {
        reason: &'static str,
    },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ParamDimMismatch { expected, actual } => {
                write!(f, "Parameter dimension mismatch: expected {expected}, actual {actual}")
            }
            ModelError::NonFiniteParam { index, value } => {
                write!(f, "Non-finite parameter at index {index}: {value}")
            }
            ModelError::InvalidConfiguration { reason } => {
                write!(f, "Invalid model configuration: {reason}")
            }
        }
    }
}
