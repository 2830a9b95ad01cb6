//! Error types for prediction calls and submissions.

use thiserror::Error;

/// Shown when a failure carries no message of its own.
pub const FALLBACK_MESSAGE: &str = "An error occurred while fetching the prediction.";

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The service answered 2xx but reported an error in the body.
    #[error("{0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl PredictError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Status(_) => self.to_string(),
            PredictError::Service(msg) if !msg.is_empty() => msg.clone(),
            PredictError::Service(_)
            | PredictError::Transport(_)
            | PredictError::Malformed(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A prediction is already in progress")]
    AlreadyPending,

    #[error("Prediction controller has been shut down")]
    ShutDown,
}
