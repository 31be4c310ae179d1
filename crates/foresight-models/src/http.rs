//! HTTP training service.
//!
//! Talks to the ingestion and training endpoints of a forecasting server:
//! `POST /api/upload` (multipart), `GET /api/preview/{identifier}` and
//! `POST /api/train` (JSON).

use async_trait::async_trait;
use foresight_training::{
    BackendError, BackendResult, DatasetFile, DatasetPreview, TrainingBackend, TrainingRequest, TrainingResult,
    UploadReceipt,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// [`TrainingBackend`] backed by a forecasting server reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// Server root, without a trailing slash (e.g. "http://localhost:5000").
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

#[derive(Deserialize)]
struct ServiceError {
    error: Option<String>,
}

impl HttpBackend {
    /// Creates a backend for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a backend reusing a preconfigured client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn transport_error(&self, e: &reqwest::Error) -> BackendError {
        error!(error = %e, base_url = %self.base_url, "Failed to reach forecasting server");
        if e.is_connect() {
            BackendError::Transport(format!("forecasting server not reachable at {}", self.base_url))
        } else {
            BackendError::Transport(e.to_string())
        }
    }

    /// Maps a response to its decoded body, or to `BackendError::Status`
    /// carrying the server's `error` message when it sent one.
    async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceError>(&body).ok().and_then(|e| e.error);
            error!(status = %status, message = ?message, "Forecasting server returned error status");
            return Err(BackendError::Status { status: status.as_u16(), message });
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse forecasting server response");
            BackendError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl TrainingBackend for HttpBackend {
    fn id(&self) -> &str {
        "http"
    }

    async fn upload(&self, file: &DatasetFile) -> BackendResult<UploadReceipt> {
        debug!(file_name = %file.file_name, bytes = file.bytes.len(), "Uploading dataset");

        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        Self::decode(response).await
    }

    async fn preview(&self, identifier: &str) -> BackendResult<DatasetPreview> {
        debug!(identifier = %identifier, "Fetching dataset preview");

        let url = self.endpoint(&format!("preview/{}", urlencoding::encode(identifier)));
        let response = self.client.get(url).send().await.map_err(|e| self.transport_error(&e))?;

        Self::decode(response).await
    }

    async fn train(&self, request: &TrainingRequest) -> BackendResult<TrainingResult> {
        debug!(
            identifier = %request.dataset_identifier,
            target = %request.target_column,
            model_type = %request.model_type.as_str(),
            params = request.params.len(),
            "Submitting training request"
        );

        let response = self
            .client
            .post(self.endpoint("train"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        Self::decode(response).await
    }
}
