use foresight_training::{BackendError, TrainingError};
use std::time::Duration;
use thiserror::Error;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

pub(crate) const UPLOAD_FAILED: &str = "File upload failed";
pub(crate) const PREVIEW_FAILED: &str = "Failed to get data preview";
pub(crate) const TRAINING_FAILED: &str = "Model training failed";
pub(crate) const NO_DATASET: &str = "Please upload a file first.";

/// Everything a session attempt can fail with. All variants are recoverable:
/// the `Display` text becomes the session's single error message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Please select a file first.")]
    NoFileSelected,

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Preview(String),

    /// No dataset, or no valid target column, before training.
    #[error("{0}")]
    MissingPrerequisite(String),

    #[error("Invalid value {value:?} for parameter {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown model type: {0}")]
    UnknownFamily(String),

    #[error("{0}")]
    TrainingFailed(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

impl SessionError {
    /// Upload phase failure. The service's own message is not shown for uploads.
    pub(crate) fn upload(error: BackendError) -> Self {
        match error {
            BackendError::Status { .. } => Self::Upload(UPLOAD_FAILED.to_string()),
            other => Self::Upload(other.to_string()),
        }
    }

    pub(crate) fn preview(error: BackendError) -> Self {
        match error {
            BackendError::Status { .. } => Self::Preview(PREVIEW_FAILED.to_string()),
            other => Self::Preview(other.to_string()),
        }
    }

    /// Training failure, preferring the message the service supplied.
    pub(crate) fn training(error: BackendError) -> Self {
        match error {
            BackendError::Status { message, .. } => {
                Self::TrainingFailed(message.unwrap_or_else(|| TRAINING_FAILED.to_string()))
            }
            other => Self::TrainingFailed(other.to_string()),
        }
    }
}

impl From<TrainingError> for SessionError {
    fn from(error: TrainingError) -> Self {
        match error {
            TrainingError::UnknownFamily(name) => Self::UnknownFamily(name),
            TrainingError::InvalidParameter { name, value } => Self::InvalidParameter { name, value },
            TrainingError::MissingPrerequisite(message) => Self::MissingPrerequisite(message),
            TrainingError::Image(message) => Self::TrainingFailed(message),
        }
    }
}
