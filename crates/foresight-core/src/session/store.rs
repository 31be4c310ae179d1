//! Session state and its transitions.

use crate::error::{SessionError, SessionResult};
use foresight_training::{
    Dataset, DatasetFile, ModelFamily, ParameterSet, ResultView, TrainingRequest, TrainingResult,
};
use tracing::debug;

/// Lifecycle flags shown by the render layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// True for the whole duration of one outstanding network attempt.
    pub is_busy: bool,
    /// Message of the most recent failed attempt; cleared when a new attempt starts.
    pub last_error: Option<String>,
}

/// A result together with the family of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTraining {
    pub family: ModelFamily,
    pub result: TrainingResult,
}

impl CompletedTraining {
    #[must_use]
    pub fn view(&self) -> ResultView {
        self.result.interpret(self.family)
    }
}

/// The inputs of a training request, copied out of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub dataset: Option<Dataset>,
    pub target_column: Option<String>,
    pub parameters: ParameterSet,
}

impl SessionSnapshot {
    pub fn request(&self) -> SessionResult<TrainingRequest> {
        Ok(TrainingRequest::build(self.dataset.as_ref(), self.target_column.as_deref(), &self.parameters)?)
    }
}

/// Mutable state of one client session.
///
/// Single-owner and single-threaded: every change goes through a transition
/// method, one at a time.
#[derive(Debug, Clone)]
pub struct SessionStore {
    selected_file: Option<DatasetFile>,
    dataset: Option<Dataset>,
    target_column: Option<String>,
    parameters: ParameterSet,
    flags: SessionFlags,
    last_training: Option<CompletedTraining>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(ModelFamily::default())
    }
}

impl SessionStore {
    /// Creates an empty session with `family` selected and its defaults seeded.
    #[must_use]
    pub fn new(family: ModelFamily) -> Self {
        Self {
            selected_file: None,
            dataset: None,
            target_column: None,
            parameters: ParameterSet::defaults_for(family),
            flags: SessionFlags::default(),
            last_training: None,
        }
    }

    pub fn selected_file(&self) -> Option<&DatasetFile> {
        self.selected_file.as_ref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn target_column(&self) -> Option<&str> {
        self.target_column.as_deref()
    }

    pub fn family(&self) -> ModelFamily {
        self.parameters.family()
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn flags(&self) -> &SessionFlags {
        &self.flags
    }

    pub fn is_busy(&self) -> bool {
        self.flags.is_busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.flags.last_error.as_deref()
    }

    pub fn last_training(&self) -> Option<&CompletedTraining> {
        self.last_training.as_ref()
    }

    /// Picks the file for the next upload and clears any shown error.
    pub fn select_file(&mut self, file: DatasetFile) {
        debug!(file = ?file, "File selected");
        self.selected_file = Some(file);
        self.flags.last_error = None;
    }

    /// Switches family and reseeds every parameter from its schema defaults.
    /// Values typed for the previous family are discarded.
    pub fn set_family(&mut self, family: ModelFamily) {
        debug!(from = %self.family(), to = %family, "Model family changed");
        self.parameters = ParameterSet::defaults_for(family);
    }

    /// Stores `raw` verbatim. Returns `false` for fields the active family
    /// does not have.
    pub fn set_parameter(&mut self, name: &str, raw: impl Into<String>) -> bool {
        let accepted = self.parameters.set(name, raw);
        if !accepted {
            debug!(field = name, family = %self.family(), "Ignoring parameter outside active schema");
        }
        accepted
    }

    pub fn set_target_column(&mut self, column: &str) -> SessionResult<()> {
        let known = self.dataset.as_ref().is_some_and(|d| d.has_column(column));
        if !known {
            return Err(SessionError::UnknownColumn(column.to_string()));
        }
        self.target_column = Some(column.to_string());
        Ok(())
    }

    /// Marks a new attempt in flight. Returns `false`, changing nothing, while
    /// another attempt is still outstanding.
    pub fn begin_attempt(&mut self) -> bool {
        if self.flags.is_busy {
            return false;
        }
        self.flags.is_busy = true;
        self.flags.last_error = None;
        true
    }

    /// Ends the outstanding attempt, recording its error if it failed.
    pub fn complete_attempt(&mut self, error: Option<&SessionError>) {
        self.flags.is_busy = false;
        self.flags.last_error = error.map(ToString::to_string);
    }

    /// Records an attempt that failed before reaching the network.
    pub fn reject(&mut self, error: &SessionError) {
        self.flags.last_error = Some(error.to_string());
    }

    /// Replaces the dataset with a freshly uploaded one and points the target
    /// at its first column.
    pub fn install_dataset(&mut self, dataset: Dataset) {
        self.target_column = dataset.columns().first().cloned();
        self.dataset = Some(dataset);
    }

    /// Swaps in a new version of the current dataset, keeping the target.
    pub fn refresh_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
    }

    pub fn store_training(&mut self, training: CompletedTraining) {
        self.last_training = Some(training);
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            dataset: self.dataset.clone(),
            target_column: self.target_column.clone(),
            parameters: self.parameters.clone(),
        }
    }
}
