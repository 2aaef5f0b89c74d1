//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` so the user sees
//! all of them at once.

use parley_common::ConfigError;

use crate::schema::ParleyConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_provider(&mut errors, config);
    validate_voice(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_provider(errors: &mut Vec<String>, config: &ParleyConfig) {
    let provider = &config.provider;
    if !(provider.endpoint.starts_with("https://") || provider.endpoint.starts_with("http://")) {
        errors.push(format!(
            "provider.endpoint must be an http(s) URL, got '{}'",
            provider.endpoint
        ));
    }
    if provider.model.trim().is_empty() {
        errors.push("provider.model must not be empty".into());
    }
    if provider.title.trim().is_empty() {
        errors.push("provider.title must not be empty".into());
    }
}

fn validate_voice(errors: &mut Vec<String>, config: &ParleyConfig) {
    if config.voice.model.trim().is_empty() {
        errors.push("voice.model must not be empty".into());
    }
    if let Some(lang) = &config.voice.language {
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
            errors.push(format!(
                "voice.language must be an ISO-639-1 code, got '{lang}'"
            ));
        }
    }
}
