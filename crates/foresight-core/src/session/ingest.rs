//! Dataset ingestion: upload, then preview.
//!
//! The preview call is made only with the identifier a successful upload
//! returned. If the preview fails, the uploaded dataset (identifier and
//! columns) stays in the store without preview rows, and
//! [`Session::retry_preview`] can fetch them again without re-uploading.

use super::{Dispatch, Session};
use crate::error::{SessionError, SessionResult, NO_DATASET};
use foresight_training::{Dataset, DatasetFile, DatasetPreview, UploadReceipt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

impl Session {
    /// Uploads the selected file and fetches its preview.
    ///
    /// Fails with `NoFileSelected` before any call when no file was picked,
    /// with `Upload` when the service refuses the file (nothing is stored),
    /// and with `Preview` when only the preview fails.
    pub async fn upload(&self) -> SessionResult<Dispatch<Dataset>> {
        if self.is_busy() {
            return Ok(Dispatch::Ignored);
        }
        let file = self.store.borrow().selected_file().cloned();
        let Some(file) = file else {
            return Err(self.reject(SessionError::NoFileSelected));
        };
        let Some(token) = self.begin() else {
            return Ok(Dispatch::Ignored);
        };

        let outcome = self.ingest(&token, &file).await;
        if let Err(e) = &outcome {
            error!(file = %file.file_name, error = %e, "Dataset ingestion failed");
        }
        self.finish(&outcome);
        outcome.map(Dispatch::Completed)
    }

    /// Fetches the preview again for the dataset already in the store.
    pub async fn retry_preview(&self) -> SessionResult<Dispatch<Dataset>> {
        if self.is_busy() {
            return Ok(Dispatch::Ignored);
        }
        let dataset = self.store.borrow().dataset().cloned();
        let Some(dataset) = dataset else {
            return Err(self.reject(SessionError::MissingPrerequisite(NO_DATASET.to_string())));
        };
        let Some(token) = self.begin() else {
            return Ok(Dispatch::Ignored);
        };

        let outcome = self.preview_phase(&token, dataset.identifier()).await.map(|preview| {
            let dataset = dataset.with_preview(preview);
            self.store.borrow_mut().refresh_dataset(dataset.clone());
            dataset
        });
        self.finish(&outcome);
        outcome.map(Dispatch::Completed)
    }

    async fn ingest(&self, token: &CancellationToken, file: &DatasetFile) -> SessionResult<Dataset> {
        let receipt = self.submit_phase(token, file).await?;

        let dataset = Dataset::from_receipt(receipt);
        info!(identifier = %dataset.identifier(), columns = dataset.columns().len(), "Dataset uploaded");
        self.store.borrow_mut().install_dataset(dataset.clone());

        let preview = self.preview_phase(token, dataset.identifier()).await.inspect_err(|e| {
            warn!(identifier = %dataset.identifier(), error = %e, "Preview failed; keeping uploaded columns");
        })?;

        let dataset = dataset.with_preview(preview);
        self.store.borrow_mut().refresh_dataset(dataset.clone());
        Ok(dataset)
    }

    async fn submit_phase(&self, token: &CancellationToken, file: &DatasetFile) -> SessionResult<UploadReceipt> {
        self.run_phase(token, self.backend.upload(file), SessionError::upload).await
    }

    async fn preview_phase(&self, token: &CancellationToken, identifier: &str) -> SessionResult<DatasetPreview> {
        let preview = self.run_phase(token, self.backend.preview(identifier), SessionError::preview).await?;
        info!(
            identifier = %identifier,
            rows = preview.row_count(),
            columns = preview.column_count(),
            head = preview.head.len(),
            "Preview received"
        );
        Ok(preview)
    }
}
