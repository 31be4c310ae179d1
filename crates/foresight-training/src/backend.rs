use crate::dataset::{DatasetFile, DatasetPreview, UploadReceipt};
use crate::error::BackendResult;
use crate::request::TrainingRequest;
use crate::result::TrainingResult;
use async_trait::async_trait;

/// Remote service that stores datasets and trains models on them.
///
/// Each method is one request/response exchange; implementations do not
/// retry and do not keep per-session state.
#[async_trait]
pub trait TrainingBackend: Send + Sync {
    fn id(&self) -> &str;

    /// Hands a file to the ingestion endpoint.
    async fn upload(&self, file: &DatasetFile) -> BackendResult<UploadReceipt>;

    /// Fetches shape and head rows for a previously uploaded dataset.
    async fn preview(&self, identifier: &str) -> BackendResult<DatasetPreview>;

    async fn train(&self, request: &TrainingRequest) -> BackendResult<TrainingResult>;
}
