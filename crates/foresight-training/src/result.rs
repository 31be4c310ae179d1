//! Training results and their family-aware interpretation.

use crate::error::{Result, TrainingError};
use crate::family::ModelFamily;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Base64-encoded PNG as delivered by the training service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(pub String);

impl EncodedImage {
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.0.trim())
            .map_err(|e| TrainingError::Image(e.to_string()))
    }

    /// `data:` URI suitable for embedding.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.0)
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedImage({} chars)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    #[serde(rename = "val_loss", alias = "validationLoss", default)]
    pub validation_loss: Vec<f64>,
}

/// Payload returned by a training call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResult {
    pub mse: f64,
    pub rmse: f64,
    pub plot: EncodedImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<TrainingHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochRow {
    /// 1-based.
    pub epoch: usize,
    pub loss: f64,
    pub validation_loss: Option<f64>,
}

/// The parts of a [`TrainingResult`] worth showing for the family that ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub family: ModelFamily,
    pub mse: f64,
    pub rmse: f64,
    pub plot: EncodedImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<EncodedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<EpochRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_time: Option<f64>,
}

impl ResultView {
    /// Classical families get a plain completion note instead of a history table.
    #[must_use]
    pub fn completion_note(&self) -> Option<&'static str> {
        self.family.profile().expects.training_time.then_some("Model training completed successfully.")
    }
}

impl TrainingResult {
    /// Projects the payload onto the fields `family` is expected to produce.
    /// Expected fields missing from the payload are left out, never an error.
    #[must_use]
    pub fn interpret(&self, family: ModelFamily) -> ResultView {
        let expects = family.profile().expects;

        ResultView {
            family,
            mse: self.mse,
            rmse: self.rmse,
            plot: self.plot.clone(),
            aic: self.aic.filter(|_| expects.aic),
            mape: self.mape.filter(|_| expects.mape),
            feature_importance: self.feature_importance.clone().filter(|_| expects.feature_importance),
            history: self.history.as_ref().filter(|_| expects.history).map(TrainingHistory::rows),
            training_time: self.training_time.filter(|_| expects.training_time),
        }
    }
}

impl TrainingHistory {
    fn rows(&self) -> Vec<EpochRow> {
        self.loss
            .iter()
            .enumerate()
            .map(|(idx, &loss)| EpochRow {
                epoch: idx + 1,
                loss,
                validation_loss: self.validation_loss.get(idx).copied(),
            })
            .collect()
    }
}
