//! Configuration schema types for parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! The two chat settings live at the top level under fixed key names;
//! everything else is optional tuning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// System prompt used when none has been saved.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are ChatGPT, a large language model trained by \
OpenAI. You are helpful, harmless, and honest. Answer questions accurately and provide \
detailed explanations when needed.";

/// Root configuration for parley.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    /// OpenRouter bearer token. Stored in cleartext.
    pub openrouter_api_key: String,
    pub system_prompt: String,
    pub provider: ProviderConfig,
    pub voice: VoiceConfig,
    pub logging: LoggingConfig,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            provider: ProviderConfig::default(),
            voice: VoiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for ParleyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParleyConfig")
            .field("openrouter_api_key", &redacted(&self.openrouter_api_key))
            .field("system_prompt", &self.system_prompt)
            .field("provider", &self.provider)
            .field("voice", &self.voice)
            .field("logging", &self.logging)
            .finish()
    }
}

impl ParleyConfig {
    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.openrouter_api_key.trim().is_empty()
    }
}

/// Completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".into(),
            model: "openai/gpt-4o".into(),
            referer: "http://localhost".into(),
            title: "parley".into(),
        }
    }
}

/// Whisper transcription settings for voice input.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// OpenAI key; falls back to `OPENAI_API_KEY` when empty.
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "whisper-1".into(),
            language: Some("en".into()),
        }
    }
}

impl fmt::Debug for VoiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive scoped to the parley crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "parley=trace",
            LogLevel::Debug => "parley=debug",
            LogLevel::Info => "parley=info",
            LogLevel::Warn => "parley=warn",
            LogLevel::Error => "parley=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "[EMPTY]"
    } else {
        "[REDACTED]"
    }
}
