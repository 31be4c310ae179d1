//! CLI configuration loading and merging.

use crate::GlobalOptions;
use foresight_core::ClientConfig;

/// Load and merge CLI configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap)
/// 2. Environment variables
/// 3. Local config file (./.foresightrc)
/// 4. Global config file (~/.foresight/config.toml)
/// 5. Defaults
pub fn load_config(options: &GlobalOptions) -> ClientConfig {
    let mut config = ClientConfig::discover_and_load();
    config.merge(&flags_layer(options));
    config
}

fn flags_layer(options: &GlobalOptions) -> ClientConfig {
    ClientConfig {
        base_url: options.base_url.clone(),
        backend: options.backend.clone(),
        request_timeout_secs: options.timeout_secs,
        default_model: None,
        log_level: options.log_level.clone(),
    }
}
