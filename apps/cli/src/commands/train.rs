//! Train command implementation.

use super::{ingest, interruptible, open_session};
use crate::render;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use foresight_core::{ClientConfig, Dispatch, Session};
use foresight_training::{EncodedImage, ModelFamily, ResultView};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for a single training run.
#[derive(Debug, Default)]
pub struct TrainOptions {
    pub target: Option<String>,
    pub model: Option<String>,
    pub params: Vec<(String, String)>,
    pub save_plot: Option<PathBuf>,
    pub save_importance: Option<PathBuf>,
    pub json: bool,
}

/// Upload `file`, apply the requested edits and train.
pub async fn execute(config: &ClientConfig, file: &Path, options: TrainOptions) -> Result<()> {
    let session = open_session(config)?;
    if let Some(ref model) = options.model {
        session.set_family(model.parse::<ModelFamily>()?);
    }

    let dataset = ingest(&session, file, true).await?;
    if !options.json {
        render::print_dataset(&dataset, None);
    }

    if let Some(ref target) = options.target {
        session.set_target_column(target)?;
    }
    apply_params(&session, &options.params)?;

    let view = match interruptible(&session, session.submit_training()).await? {
        Dispatch::Completed(view) => view,
        Dispatch::Ignored => bail!("Training ignored while another request was in flight"),
    };

    if let Some(ref path) = options.save_plot {
        save_image(&view.plot, path)?;
    }
    if let Some(ref path) = options.save_importance {
        match view.feature_importance {
            Some(ref image) => save_image(image, path)?,
            None => warn!(family = %view.family, "No feature importance plot in this result"),
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_summary(&session, &view);
    }
    Ok(())
}

fn apply_params(session: &Session, params: &[(String, String)]) -> Result<()> {
    for (name, value) in params {
        if !session.set_parameter(name, value.as_str()) {
            let family = session.store().family();
            bail!("Parameter '{}' does not apply to {}", name, family);
        }
    }
    Ok(())
}

fn save_image(image: &EncodedImage, path: &Path) -> Result<()> {
    let bytes = image.decode()?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}

fn print_summary(session: &Session, view: &ResultView) {
    let store = session.store();
    if let Some(target) = store.target_column() {
        println!("{} {}", "Target:".bold(), target);
    }
    let params: Vec<String> = store.parameters().iter().map(|(field, value)| format!("{}={}", field.name, value)).collect();
    println!("{} {}", "Parameters:".bold(), params.join(" "));
    render::print_result(view);
}
