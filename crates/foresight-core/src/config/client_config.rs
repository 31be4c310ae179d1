//! Client configuration file support.
//!
//! Provides configuration structure and loading for the forecasting client.

use foresight_models::{BackendConfig, BackendType};
use foresight_training::ModelFamily;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Client configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the forecasting server
    #[serde(default)]
    pub base_url: Option<String>,

    /// Backend to use (http, mock)
    #[serde(default)]
    pub backend: Option<String>,

    /// Per-request timeout in seconds; unset waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Model family selected when a session starts
    #[serde(default)]
    pub default_model: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A backend or model name nothing recognises.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ClientConfig {
    /// Reads one TOML layer. A file that does not exist is `Ok(None)`.
    pub fn load_from_file(path: &Path) -> ConfigResult<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        toml::from_str(&content).map(Some).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// `~/.foresight/config.toml`, or `None` without a home directory.
    pub fn default_global_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".foresight").join("config.toml"))
    }

    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".foresightrc")
    }

    /// Discover and load configuration.
    ///
    /// Precedence, lowest first:
    /// 1. Global config (~/.foresight/config.toml)
    /// 2. Local config (./.foresightrc)
    /// 3. `FORESIGHT_*` environment variables
    pub fn discover_and_load() -> Self {
        let global = Self::default_global_path();
        let mut config = Self::load_layers(global.as_deref(), &Self::default_local_path());
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Loads `global`, then `local` on top. Missing or unreadable files are skipped.
    pub fn load_layers(global: Option<&Path>, local: &Path) -> Self {
        let mut config = Self::default();
        for path in global.into_iter().chain([local]) {
            match Self::load_from_file(path) {
                Ok(Some(layer)) => config.merge(&layer),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Ignoring configuration file"),
            }
        }
        config
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref base_url) = other.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(ref backend) = other.backend {
            self.backend = Some(backend.clone());
        }
        if let Some(timeout) = other.request_timeout_secs {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(ref default_model) = other.default_model {
            self.default_model = Some(default_model.clone());
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
    }

    /// Overrides fields from `FORESIGHT_BASE_URL`, `FORESIGHT_BACKEND`,
    /// `FORESIGHT_TIMEOUT_SECS` and `FORESIGHT_MODEL`, as resolved by `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup("FORESIGHT_BASE_URL") {
            self.base_url = Some(base_url);
        }
        if let Some(backend) = lookup("FORESIGHT_BACKEND") {
            self.backend = Some(backend);
        }
        if let Some(timeout) = lookup("FORESIGHT_TIMEOUT_SECS") {
            match timeout.trim().parse() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %timeout, "Ignoring non-numeric FORESIGHT_TIMEOUT_SECS"),
            }
        }
        if let Some(model) = lookup("FORESIGHT_MODEL") {
            self.default_model = Some(model);
        }
    }

    /// Backend selection derived from `backend` and `base_url`.
    pub fn backend_config(&self) -> ConfigResult<BackendConfig> {
        let backend_type = match self.backend.as_deref() {
            Some(name) => name.parse::<BackendType>().map_err(ConfigError::InvalidValue)?,
            None => BackendType::default(),
        };
        let mut config = BackendConfig::new(backend_type);
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(config)
    }

    pub fn model_family(&self) -> ConfigResult<ModelFamily> {
        match self.default_model.as_deref() {
            Some(name) => name.parse::<ModelFamily>().map_err(|e| ConfigError::InvalidValue(e.to_string())),
            None => Ok(ModelFamily::default()),
        }
    }

    /// Zero means no timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_single_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://forecast:5000\"\nrequest_timeout_secs = 30\n").unwrap();

        let config = ClientConfig::load_from_file(&path).unwrap().unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://forecast:5000"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(ClientConfig::load_from_file(&temp.path().join("absent.toml")).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_path_reports_read_error() {
        let temp = TempDir::new().unwrap();
        let err = ClientConfig::load_from_file(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { ref path, .. } if path == temp.path()));
    }

    #[test]
    fn test_local_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        let local = temp.path().join(".foresightrc");
        std::fs::write(&global, "base_url = \"http://global:5000\"\nbackend = \"http\"\nlog_level = \"debug\"\n").unwrap();
        std::fs::write(&local, "base_url = \"http://local:5000\"\ndefault_model = \"arima\"\n").unwrap();

        let config = ClientConfig::load_layers(Some(&global), &local);
        assert_eq!(config.base_url.as_deref(), Some("http://local:5000"));
        assert_eq!(config.backend.as_deref(), Some("http"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.model_family().unwrap(), ModelFamily::Arima);
    }

    #[test]
    fn test_missing_and_malformed_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.toml");
        std::fs::write(&broken, "base_url = [").unwrap();

        let err = ClientConfig::load_from_file(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
        let config = ClientConfig::load_layers(Some(&temp.path().join("absent.toml")), &broken);
        assert_eq!(config, ClientConfig::default());
        let config = ClientConfig::load_layers(None, &temp.path().join("absent.toml"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [("FORESIGHT_BACKEND", "mock"), ("FORESIGHT_TIMEOUT_SECS", "12"), ("FORESIGHT_MODEL", "prophet")].into();
        let mut config = ClientConfig { backend: Some("http".to_string()), ..Default::default() };
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.backend_config().unwrap().backend_type, BackendType::Mock);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(12)));
        assert_eq!(config.model_family().unwrap(), ModelFamily::Prophet);
    }

    #[test]
    fn test_invalid_values() {
        let config = ClientConfig {
            backend: Some("carrier-pigeon".to_string()),
            default_model: Some("svm".to_string()),
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.backend_config(), Err(ConfigError::InvalidValue(_))));
        assert!(matches!(config.model_family(), Err(ConfigError::InvalidValue(_))));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        let backend = config.backend_config().unwrap();
        assert_eq!(backend.backend_type, BackendType::Http);
        assert!(backend.base_url.is_none());
        assert_eq!(config.model_family().unwrap(), ModelFamily::Cnn);
        assert_eq!(config.request_timeout(), None);
    }
}
