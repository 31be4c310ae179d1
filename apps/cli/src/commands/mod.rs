//! Command implementations for the Foresight CLI.

pub mod preview;
pub mod schema;
pub mod train;

use anyhow::{Context, Result};
use colored::Colorize;
use foresight_core::{ClientConfig, Dispatch, Session, SessionError};
use foresight_training::{Dataset, DatasetFile};
use std::future::Future;
use std::path::Path;
use tracing::warn;

/// Creates the session described by `config`.
pub fn open_session(config: &ClientConfig) -> Result<Session> {
    Session::from_config(config).context("Invalid client configuration")
}

/// Awaits `attempt`, cancelling the session's in-flight request on Ctrl-C.
pub async fn interruptible<F: Future>(session: &Session, attempt: F) -> F::Output {
    tokio::pin!(attempt);
    tokio::select! {
        outcome = &mut attempt => outcome,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted, cancelling request...".yellow());
            session.cancel();
            attempt.await
        }
    }
}

/// Selects `path` and runs upload plus preview.
///
/// With `allow_partial`, a failed preview after a successful upload yields the
/// uploaded dataset without preview rows instead of an error.
pub async fn ingest(session: &Session, path: &Path, allow_partial: bool) -> Result<Dataset> {
    let file = DatasetFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    session.select_file(file);

    match interruptible(session, session.upload()).await {
        Ok(Dispatch::Completed(dataset)) => Ok(dataset),
        Ok(Dispatch::Ignored) => anyhow::bail!("Upload ignored while another request was in flight"),
        Err(e @ SessionError::Preview(_)) if allow_partial => {
            let partial = session.store().dataset().cloned();
            let dataset = partial.ok_or_else(|| e.clone())?;
            warn!(identifier = %dataset.identifier(), error = %e, "Continuing without preview");
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            Ok(dataset)
        }
        Err(e) => Err(e.into()),
    }
}
