//! Foresight Training
//!
//! Backend-agnostic vocabulary for forecasting jobs:
//! - Model families and their parameter schemas (`ModelFamily`, `schema_for`)
//! - Editable parameter values and their coercion (`ParameterSet`)
//! - Datasets as reported by the ingestion service (`Dataset`)
//! - The request sent to, and result returned by, a training service
//! - Implementing training services (`TrainingBackend`)

pub mod backend;
pub mod dataset;
pub mod error;
pub mod family;
pub mod params;
pub mod request;
pub mod result;
pub mod schema;

pub use backend::TrainingBackend;
pub use dataset::{Dataset, DatasetFile, DatasetPreview, PreviewInfo, PreviewRow, UploadReceipt};
pub use error::{BackendError, BackendResult, Result, TrainingError};
pub use family::ModelFamily;
pub use params::{ParamValue, ParameterSet};
pub use request::TrainingRequest;
pub use result::{EncodedImage, EpochRow, ResultView, TrainingHistory, TrainingResult};
pub use schema::{schema_for, schema_for_name, FamilyProfile, FieldKind, FieldSpec, ResultExpectations};
