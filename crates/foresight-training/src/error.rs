use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrainingError>;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("unknown model family: {0}")]
    UnknownFamily(String),

    #[error("invalid value {value:?} for parameter {name}")]
    InvalidParameter { name: String, value: String },

    #[error("{0}")]
    MissingPrerequisite(String),

    #[error("image decode error: {0}")]
    Image(String),
}

/// Failure reported by a training service implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BackendError {
    /// The service could not be reached or the exchange broke off.
    #[error("network error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: u16,
        /// Message extracted from the `error` field of the response body, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The service answered with a body that does not match the contract.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl BackendError {
    /// The message supplied by the service itself, when it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
