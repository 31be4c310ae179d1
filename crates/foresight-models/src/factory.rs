//! Backend factory for creating training services from configuration.

use crate::http::DEFAULT_BASE_URL;
use crate::{HttpBackend, MockBackend};
use foresight_training::TrainingBackend;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Backend type enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendType {
    /// Forecasting server over HTTP.
    #[default]
    Http,
    /// Scripted in-process backend.
    Mock,
}

impl FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "mock" | "offline" => Ok(Self::Mock),
            other => Err(format!("unknown backend '{other}' (expected http or mock)")),
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// The type of backend to create.
    pub backend_type: BackendType,
    /// Server root for HTTP backends; defaults to `http://localhost:5000`.
    pub base_url: Option<String>,
}

impl BackendConfig {
    #[must_use]
    pub fn new(backend_type: BackendType) -> Self {
        Self { backend_type, base_url: None }
    }

    /// Sets the server root for HTTP backends.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Factory for creating backend instances.
pub struct BackendFactory;

impl BackendFactory {
    /// Creates a backend instance from the given configuration.
    pub fn create(config: BackendConfig) -> Arc<dyn TrainingBackend> {
        debug!(backend_type = ?config.backend_type, base_url = ?config.base_url, "Creating training backend");

        match config.backend_type {
            BackendType::Http => {
                Arc::new(HttpBackend::new(config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())))
            }
            BackendType::Mock => Arc::new(MockBackend::default()),
        }
    }
}
