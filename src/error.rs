use thiserror::Error;

pub const INVALID_EMAIL: &str = "Invalid email format.";

/// Why an add or delete did not reach a successful backend response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-success status.
    #[error("{0}")]
    Backend(String),

    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Network(String),
}

impl SyncError {
    pub fn invalid_email() -> Self {
        Self::Validation(INVALID_EMAIL.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            SyncError::Validation(msg) | SyncError::Backend(msg) | SyncError::Network(msg) => msg,
        }
    }
}
