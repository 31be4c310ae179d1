use crate::dataset::Dataset;
use crate::error::{Result, TrainingError};
use crate::family::ModelFamily;
use crate::params::{ParamValue, ParameterSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MISSING_PREREQUISITE: &str = "Please upload a file and select a target column first.";

/// Body of a training call. Built fresh for each submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    #[serde(rename = "filename")]
    pub dataset_identifier: String,
    pub target_column: String,
    pub model_type: ModelFamily,
    pub params: BTreeMap<String, ParamValue>,
}

impl TrainingRequest {
    /// Assembles a request from session state.
    ///
    /// Fails with `MissingPrerequisite` unless a dataset is present and the
    /// target is one of its columns, and with `InvalidParameter` when a
    /// numeric field does not parse.
    pub fn build(dataset: Option<&Dataset>, target_column: Option<&str>, params: &ParameterSet) -> Result<Self> {
        let missing = || TrainingError::MissingPrerequisite(MISSING_PREREQUISITE.to_string());

        let dataset = dataset.ok_or_else(missing)?;
        let target_column = target_column.filter(|t| dataset.has_column(t)).ok_or_else(missing)?;

        Ok(Self {
            dataset_identifier: dataset.identifier().to_string(),
            target_column: target_column.to_string(),
            model_type: params.family(),
            params: params.coerce()?,
        })
    }
}
