use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PilotError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("goal not found: {0}")]
    GoalNotFound(u64),

    #[error("task not found: {0}")]
    TaskNotFound(u64),

    #[error("store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),
}

impl PilotError {
    /// True for both goal and task lookups that came back empty.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PilotError::GoalNotFound(_) | PilotError::TaskNotFound(_))
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PilotError::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PilotError>;
