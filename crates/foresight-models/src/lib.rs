//! Training service implementations for Foresight.
//!
//! This crate provides concrete implementations of the `TrainingBackend` trait.
//!
//! # Supported Backends
//!
//! - **Http**: A forecasting server reachable over HTTP
//! - **Mock**: Scripted, call-counting backend for testing and offline demos

pub mod factory;
pub mod http;

use async_trait::async_trait;
use foresight_training::{
    BackendError, BackendResult, DatasetFile, DatasetPreview, EncodedImage, ModelFamily, PreviewInfo, PreviewRow,
    TrainingBackend, TrainingHistory, TrainingRequest, TrainingResult, UploadReceipt,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub use factory::{BackendConfig, BackendFactory, BackendType};
pub use http::HttpBackend;

/// 1x1 transparent PNG.
const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

const PREVIEW_ROWS: usize = 5;

/// A scripted implementation of `TrainingBackend` for testing and demonstration.
///
/// Every call is counted. Without scripted failures it accepts any upload,
/// previews synthetic rows and answers training with a result shaped like the
/// requested family's.
#[derive(Debug)]
pub struct MockBackend {
    id: String,
    columns: Vec<String>,
    latency: Option<Duration>,
    upload_failure: Option<BackendError>,
    preview_failure: Option<BackendError>,
    train_outcome: Option<BackendResult<TrainingResult>>,
    upload_calls: AtomicUsize,
    preview_calls: AtomicUsize,
    train_calls: AtomicUsize,
    last_request: Mutex<Option<TrainingRequest>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock")
    }
}

impl MockBackend {
    /// Creates a new `MockBackend` with the given ID, reporting `date` and
    /// `value` columns for every upload.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: vec!["date".to_string(), "value".to_string()],
            latency: None,
            upload_failure: None,
            preview_failure: None,
            train_outcome: None,
            upload_calls: AtomicUsize::new(0),
            preview_calls: AtomicUsize::new(0),
            train_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Delays every call, so tests can act while a call is in flight.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    #[must_use]
    pub fn failing_upload(mut self, error: BackendError) -> Self {
        self.upload_failure = Some(error);
        self
    }

    #[must_use]
    pub fn failing_preview(mut self, error: BackendError) -> Self {
        self.preview_failure = Some(error);
        self
    }

    #[must_use]
    pub fn failing_train(mut self, error: BackendError) -> Self {
        self.train_outcome = Some(Err(error));
        self
    }

    /// Answers every training call with `result`.
    #[must_use]
    pub fn with_result(mut self, result: TrainingResult) -> Self {
        self.train_outcome = Some(Ok(result));
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn preview_calls(&self) -> usize {
        self.preview_calls.load(Ordering::SeqCst)
    }

    pub fn train_calls(&self) -> usize {
        self.train_calls.load(Ordering::SeqCst)
    }

    /// Total number of calls across all endpoints.
    pub fn calls(&self) -> usize {
        self.upload_calls() + self.preview_calls() + self.train_calls()
    }

    /// The most recent training request received.
    pub fn last_request(&self) -> Option<TrainingRequest> {
        self.last_request.lock().ok().and_then(|slot| slot.clone())
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn synthetic_rows(&self) -> Vec<PreviewRow> {
        (0..PREVIEW_ROWS)
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(col, name)| (name.clone(), serde_json::json!(row * 10 + col)))
                    .collect()
            })
            .collect()
    }
}

/// A result carrying every optional field `family` is expected to produce.
#[must_use]
pub fn synthetic_result(family: ModelFamily) -> TrainingResult {
    let expects = family.profile().expects;
    TrainingResult {
        mse: 0.25,
        rmse: 0.5,
        plot: EncodedImage(PLACEHOLDER_PNG.to_string()),
        aic: expects.aic.then_some(412.7),
        mape: expects.mape.then_some(6.3),
        feature_importance: expects.feature_importance.then(|| EncodedImage(PLACEHOLDER_PNG.to_string())),
        history: expects.history.then(|| TrainingHistory {
            loss: vec![0.9, 0.52, 0.31],
            validation_loss: vec![0.95, 0.61, 0.4],
        }),
        training_time: expects.training_time.then_some(1.84),
    }
}

#[async_trait]
impl TrainingBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn upload(&self, file: &DatasetFile) -> BackendResult<UploadReceipt> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        debug!(backend_id = %self.id, file = ?file, "MockBackend receiving upload");
        self.pause().await;

        if let Some(error) = &self.upload_failure {
            return Err(error.clone());
        }
        Ok(UploadReceipt { identifier: file.file_name.clone(), columns: self.columns.clone() })
    }

    async fn preview(&self, identifier: &str) -> BackendResult<DatasetPreview> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        debug!(backend_id = %self.id, identifier = %identifier, "MockBackend building preview");
        self.pause().await;

        if let Some(error) = &self.preview_failure {
            return Err(error.clone());
        }
        let head = self.synthetic_rows();
        Ok(DatasetPreview {
            info: PreviewInfo { shape: (head.len() as u64 * 20, self.columns.len() as u64), columns: self.columns.clone() },
            head,
        })
    }

    async fn train(&self, request: &TrainingRequest) -> BackendResult<TrainingResult> {
        self.train_calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            backend_id = %self.id,
            model_type = %request.model_type.as_str(),
            params = ?request.params,
            "MockBackend training"
        );
        if let Ok(mut slot) = self.last_request.lock() {
            *slot = Some(request.clone());
        }
        self.pause().await;

        match &self.train_outcome {
            Some(outcome) => outcome.clone(),
            None => Ok(synthetic_result(request.model_type)),
        }
    }
}
