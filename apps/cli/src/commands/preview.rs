//! Preview command implementation.

use super::{ingest, open_session};
use crate::render;
use anyhow::Result;
use foresight_core::ClientConfig;
use serde_json::json;
use std::path::Path;

/// Upload `file` and print the preview the service returns.
pub async fn execute(config: &ClientConfig, file: &Path, json_output: bool) -> Result<()> {
    let session = open_session(config)?;
    let dataset = ingest(&session, file, false).await?;
    let store = session.store();

    if json_output {
        let output = json!({
            "identifier": dataset.identifier(),
            "columns": dataset.columns(),
            "targetColumn": store.target_column(),
            "preview": dataset.preview(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::print_dataset(&dataset, store.target_column());
    }
    Ok(())
}
