//! Error types.
//!
//! - `LevelError`: typed failures of the level-curve pipeline (library side)
//! - `AppError`: what the `lvl` binary reports (message + process exit code)

/// Failures raised by model construction, solving and band computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("Unknown model kind '{0}' (expected LAR or L2).")]
    UnknownModelKind(String),

    #[error("Invalid model configuration: {0}")]
    ModelConfiguration(String),

    #[error("Invalid target value {0}: level values must be finite and > 0.")]
    InvalidTargetValue(f64),

    #[error("Invalid sampling grid: {0}")]
    InvalidSampling(String),

    #[error(
        "Misaligned series: args={args}, negative={negative}, positive={positive} (lengths must match)."
    )]
    MisalignedSeries {
        args: usize,
        negative: usize,
        positive: usize,
    },

    #[error("Insufficient data for a cubic fit: {available} points, need at least {required}.")]
    InsufficientData { available: usize, required: usize },

    #[error("Cubic fit aborted: {0}")]
    FitAborted(String),
}

impl LevelError {
    /// Whether the failure only affects a single level (degrades to an empty band).
    pub fn is_per_level(&self) -> bool {
        matches!(
            self,
            LevelError::InsufficientData { .. } | LevelError::FitAborted(_)
        )
    }

    /// Process exit code used when this error aborts the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            LevelError::UnknownModelKind(_)
            | LevelError::ModelConfiguration(_)
            | LevelError::InvalidTargetValue(_)
            | LevelError::InvalidSampling(_) => 2,
            LevelError::InsufficientData { .. } | LevelError::FitAborted(_) => 3,
            LevelError::MisalignedSeries { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<LevelError> for AppError {
    fn from(err: LevelError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
