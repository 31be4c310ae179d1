use serde::{Deserialize, Serialize};
use std::path::Path;

/// One preview row, column name to cell value, in the order the service sent them.
pub type PreviewRow = serde_json::Map<String, serde_json::Value>;

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }

    /// Reads `path` from disk, keeping only its final component as the name.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}

impl std::fmt::Debug for DatasetFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Answer of the ingestion service to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Identifier under which the service stored the file.
    #[serde(rename = "filename")]
    pub identifier: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewInfo {
    /// `[rows, columns]`.
    pub shape: (u64, u64),
    pub columns: Vec<String>,
}

/// Answer of the ingestion service to a preview request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    pub info: PreviewInfo,
    pub head: Vec<PreviewRow>,
}

impl DatasetPreview {
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.info.shape.0
    }

    #[must_use]
    pub fn column_count(&self) -> u64 {
        self.info.shape.1
    }
}

/// A dataset the ingestion service has accepted.
///
/// Never edited in place: attaching a preview yields a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    identifier: String,
    columns: Vec<String>,
    preview: Option<DatasetPreview>,
}

impl Dataset {
    #[must_use]
    pub fn from_receipt(receipt: UploadReceipt) -> Self {
        Self { identifier: receipt.identifier, columns: receipt.columns, preview: None }
    }

    #[must_use]
    pub fn with_preview(self, preview: DatasetPreview) -> Self {
        Self { preview: Some(preview), ..self }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    #[must_use]
    pub fn preview(&self) -> Option<&DatasetPreview> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn preview_rows(&self) -> &[PreviewRow] {
        self.preview.as_ref().map(|p| p.head.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn row_count(&self) -> Option<u64> {
        self.preview.as_ref().map(DatasetPreview::row_count)
    }

    #[must_use]
    pub fn column_count(&self) -> Option<u64> {
        self.preview.as_ref().map(DatasetPreview::column_count)
    }
}
