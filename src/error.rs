//! Error types shared by the stores, the controller and the countdown task

use thiserror::Error;

/// Errors produced by timer and preset operations
#[derive(Debug, Error)]
pub enum TimerError {
    /// A `.timer` filename does not decode into `<timestamp>---<duration>.timer`
    #[error("corrupt timer record {identity}: {reason}")]
    CorruptRecord { identity: String, reason: String },

    /// The timer or preset is gone (already fired, stopped or deleted)
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion action of a fired timer failed
    #[error("completion action failed: {0}")]
    BackgroundActionFailure(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The detached countdown process could not be started
    #[error("failed to launch countdown process: {0}")]
    Launch(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TimerError {
    pub fn corrupt(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the recoverable "already gone" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TimerError>;
