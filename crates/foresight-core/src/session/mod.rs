//! Client session driver.
//!
//! A [`Session`] owns the [`SessionStore`] and the backend, and runs the
//! network phases: upload and preview ([`ingest`]) and training
//! ([`orchestrator`]). It is meant for a single-threaded event loop. User
//! actions and network completions are interleaved only at `.await` points,
//! and the store is never borrowed across one.
//!
//! `isBusy` is the only guard: while an attempt is outstanding, new upload or
//! training triggers resolve to [`Dispatch::Ignored`] without a network call.

mod ingest;
mod orchestrator;
mod store;

pub use store::{CompletedTraining, SessionFlags, SessionSnapshot, SessionStore};

use crate::config::{ClientConfig, ConfigResult};
use crate::error::{SessionError, SessionResult};
use foresight_models::BackendFactory;
use foresight_training::{BackendError, BackendResult, DatasetFile, ModelFamily, TrainingBackend};
use std::cell::{Ref, RefCell};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Outcome of a trigger that may be refused while another attempt runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<T> {
    /// The attempt ran to completion.
    Completed(T),
    /// Another attempt was in flight; nothing was sent.
    Ignored,
}

impl<T> Dispatch<T> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Ignored => None,
        }
    }
}

pub struct Session {
    store: RefCell<SessionStore>,
    backend: Arc<dyn TrainingBackend>,
    cancel: RefCell<CancellationToken>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("backend", &self.backend.id())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session talking to `backend`, with CNN selected and no timeout.
    pub fn new(backend: Arc<dyn TrainingBackend>) -> Self {
        Self {
            store: RefCell::new(SessionStore::default()),
            backend,
            cancel: RefCell::new(CancellationToken::new()),
            timeout: None,
        }
    }

    /// Builds the backend, initial family and timeout from configuration.
    pub fn from_config(config: &ClientConfig) -> ConfigResult<Self> {
        let backend = BackendFactory::create(config.backend_config()?);
        let family = config.model_family()?;
        info!(backend = %backend.id(), family = %family, timeout = ?config.request_timeout(), "Session created");
        Ok(Self::new(backend).with_family(family).with_timeout(config.request_timeout()))
    }

    #[must_use]
    pub fn with_family(self, family: ModelFamily) -> Self {
        self.store.borrow_mut().set_family(family);
        self
    }

    /// Bounds each network phase. `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &dyn TrainingBackend {
        self.backend.as_ref()
    }

    /// Read access for rendering. Drop the guard before awaiting.
    pub fn store(&self) -> Ref<'_, SessionStore> {
        self.store.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.store.borrow().is_busy()
    }

    pub fn select_file(&self, file: DatasetFile) {
        self.store.borrow_mut().select_file(file);
    }

    pub fn set_family(&self, family: ModelFamily) {
        self.store.borrow_mut().set_family(family);
    }

    pub fn set_parameter(&self, name: &str, raw: impl Into<String>) -> bool {
        self.store.borrow_mut().set_parameter(name, raw)
    }

    pub fn set_target_column(&self, column: &str) -> SessionResult<()> {
        self.store.borrow_mut().set_target_column(column)
    }

    /// Aborts the outstanding attempt, which then fails with
    /// `SessionError::Cancelled`. Returns `false` when nothing was in flight.
    pub fn cancel(&self) -> bool {
        if !self.is_busy() {
            return false;
        }
        info!("Cancelling in-flight request");
        self.cancel.borrow().cancel();
        true
    }

    /// Starts an attempt, handing out the token that can abort it.
    fn begin(&self) -> Option<CancellationToken> {
        if !self.store.borrow_mut().begin_attempt() {
            return None;
        }
        let token = CancellationToken::new();
        *self.cancel.borrow_mut() = token.clone();
        Some(token)
    }

    fn finish<T>(&self, outcome: &SessionResult<T>) {
        self.store.borrow_mut().complete_attempt(outcome.as_ref().err());
    }

    /// Records a failure detected before any network call.
    fn reject(&self, error: SessionError) -> SessionError {
        debug!(error = %error, "Attempt rejected before dispatch");
        self.store.borrow_mut().reject(&error);
        error
    }

    /// Awaits one backend call under the attempt's token and the configured
    /// timeout.
    async fn run_phase<T>(
        &self,
        token: &CancellationToken,
        call: impl Future<Output = BackendResult<T>>,
        failure: impl FnOnce(BackendError) -> SessionError,
    ) -> SessionResult<T> {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(outcome) => outcome.map_err(failure),
                    Err(_) => Err(SessionError::TimedOut(limit)),
                },
                None => call.await.map_err(failure),
            }
        };

        tokio::select! {
            () = token.cancelled() => Err(SessionError::Cancelled),
            outcome = bounded => outcome,
        }
    }
}
