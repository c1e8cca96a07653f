use std::time::Duration;

use gateway::RequestError;
use thiserror::Error;
use types::RecordId;

/// Everything that can go wrong while driving the dashboard. None of these
/// escape the controller: each one ends up as a toast.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Could not load records: {0}")]
    ListFetch(RequestError),

    #[error("Could not load record {id}: {source}")]
    DetailFetch { id: RecordId, source: RequestError },

    #[error("Referenced record not found: {0}")]
    NotFound(RecordId),

    #[error("Could not start a game: {0}")]
    Submission(RequestError),

    #[error("Game run failed: {0}")]
    TaskFailure(String),

    #[error("Poll failed: {0}")]
    PollError(RequestError),

    #[error("Game run did not finish within {0:?}")]
    TaskTimedOut(Duration),
}

impl DashboardError {
    pub fn level(&self) -> ToastLevel {
        match self {
            DashboardError::NotFound(_) => ToastLevel::Warning,
            _ => ToastLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }
}

impl From<&DashboardError> for Toast {
    fn from(error: &DashboardError) -> Self {
        Toast::new(error.level(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_is_only_a_warning() {
        let toast = Toast::from(&DashboardError::NotFound(RecordId::new("r7")));
        assert_eq!(toast.level, ToastLevel::Warning);
        assert_eq!(toast.message, "Referenced record not found: r7");
    }

    #[test]
    fn test_task_failure_keeps_backend_message() {
        let toast = Toast::from(&DashboardError::TaskFailure("simulation crashed".into()));
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.contains("simulation crashed"));
    }

    #[test]
    fn test_poll_error_is_labelled() {
        let err = DashboardError::PollError(RequestError::Transport("connection reset".into()));
        assert_eq!(err.to_string(), "Poll failed: Network error: connection reset");
    }
}
