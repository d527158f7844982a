use thiserror::Error;

/// Message shown when no better explanation is available
pub const GENERIC_FAILURE: &str = "Failed to evaluate answer";

/// Failure of a single evaluation call. `Display` is the user-visible message.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Network, DNS or timeout failure, or the body could not be read
    #[error("{}", GENERIC_FAILURE)]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{message}")]
    Service { status: u16, message: String },

    /// A success response whose body does not have the expected shape
    #[error("Invalid response format: {0}")]
    ContractViolation(String),
}

impl EvaluationError {
    pub fn contract(reason: impl Into<String>) -> Self {
        EvaluationError::ContractViolation(reason.into())
    }

    /// HTTP status of a service error
    pub fn status(&self) -> Option<u16> {
        match self {
            EvaluationError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
