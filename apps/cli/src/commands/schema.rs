//! Schema command implementation.

use crate::render;
use anyhow::Result;
use foresight_training::{schema_for, ModelFamily};
use serde_json::json;

/// Execute the schema command for one family, or all of them.
pub fn execute(model: Option<&str>, json_output: bool) -> Result<()> {
    let families = match model {
        Some(name) => vec![name.parse::<ModelFamily>()?],
        None => ModelFamily::ALL.to_vec(),
    };

    if json_output {
        let listing: Vec<_> = families
            .iter()
            .map(|family| {
                json!({
                    "modelType": family.as_str(),
                    "label": family.label(),
                    "fields": schema_for(*family),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for family in families {
        render::print_schema(family, &schema_for(family));
    }
    Ok(())
}
