//! Domain error types.

/// Top-level error type for tradegame.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price feed unavailable: {reason}")]
    FeedUnavailable { reason: String },

    #[error("order execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GameError> for std::process::ExitCode {
    fn from(err: &GameError) -> Self {
        let code: u8 = match err {
            GameError::Io(_) => 1,
            GameError::ConfigParse { .. }
            | GameError::ConfigMissing { .. }
            | GameError::ConfigInvalid { .. } => 2,
            GameError::FeedUnavailable { .. } => 3,
            GameError::ExecutionFailed { .. } => 4,
            GameError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
