use crate::error::TrainingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Forecasting algorithm selected for a training run.
///
/// The family decides which parameter fields are active and which optional
/// result fields are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    #[default]
    Cnn,
    Lstm,
    Arima,
    Prophet,
    #[serde(rename = "xgboost")]
    XgBoost,
    Transformer,
}

impl ModelFamily {
    pub const ALL: [Self; 6] =
        [Self::Cnn, Self::Lstm, Self::Arima, Self::Prophet, Self::XgBoost, Self::Transformer];

    /// Wire identifier, as sent in `modelType`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cnn => "cnn",
            Self::Lstm => "lstm",
            Self::Arima => "arima",
            Self::Prophet => "prophet",
            Self::XgBoost => "xgboost",
            Self::Transformer => "transformer",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cnn => "CNN",
            Self::Lstm => "LSTM",
            Self::Arima => "ARIMA",
            Self::Prophet => "Prophet",
            Self::XgBoost => "XGBoost",
            Self::Transformer => "Transformer",
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelFamily {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrainingError::UnknownFamily(s.to_string()))
    }
}
