//! parley configuration.
//!
//! A small TOML file holding the OpenRouter key and system prompt under
//! fixed top-level keys, plus optional provider, voice, and logging
//! tables. Loaded once at startup, written only on an explicit save.
//!
//! ```rust,no_run
//! let config = parley_config::load_config().expect("failed to load config");
//! println!("model: {}", config.provider.model);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{
    LogLevel, LoggingConfig, ParleyConfig, ProviderConfig, VoiceConfig, DEFAULT_SYSTEM_PROMPT,
};
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;

use parley_common::ConfigError;

/// Environment variable consulted when no key is stored in the file.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Load config from the platform default path.
///
/// Creates `config.toml` from the template if none exists, then fills an
/// empty API key from `OPENROUTER_API_KEY`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Same as [`load_config`] but for an explicit file path.
pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let mut config = toml_loader::load_or_create(path)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut ParleyConfig) {
    if config.has_api_key() {
        return;
    }
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            tracing::info!("using API key from {API_KEY_ENV}");
            config.openrouter_api_key = key.trim().to_string();
        }
    }
}
