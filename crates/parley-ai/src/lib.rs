//! Conversation engine for parley.
//!
//! Provides:
//! - The turn/content-part data model shared by every layer
//! - An OpenRouter chat-completions client (non-streaming)
//! - `Session`, the single-flight conversation orchestrator
//! - Attachment conversion (images and plain text)
//! - A small markdown-to-markup renderer
//! - Whisper speech-to-text for voice input

pub mod attachment;
pub mod markup;
pub mod openrouter;
pub mod session;
pub mod surface;
pub mod token_tracker;
pub mod whisper;

use async_trait::async_trait;

pub use attachment::Attachment;
pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use session::{Session, Settings, SubmitOutcome};
pub use surface::Surface;
pub use token_tracker::TokenTracker;
pub use whisper::{WhisperClient, WhisperConfig};

/// A chat-completion backend.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send `turns` (system turn first) and return the first choice.
    async fn send_message(
        &self,
        api_key: &str,
        turns: &[Turn],
        max_tokens: u32,
    ) -> Result<AiResponse, AiError>;
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One atomic piece of a turn's payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentPart {
    Text {
        value: String,
    },
    Image {
        mime_type: String,
        /// Base64 (standard alphabet) encoded bytes.
        data: String,
    },
}

impl ContentPart {
    pub fn text(value: impl Into<String>) -> Self {
        ContentPart::Text {
            value: value.into(),
        }
    }

    /// `data:` URL form used by the image content part on the wire.
    pub fn data_url(&self) -> Option<String> {
        match self {
            ContentPart::Image { mime_type, data } => Some(format!("data:{mime_type};base64,{data}")),
            ContentPart::Text { .. } => None,
        }
    }
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Turn {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// A turn holding a single text part.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![ContentPart::text(text)])
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    /// Text parts joined by newlines; image parts are skipped.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { value } => Some(value.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    /// Model that actually served the request, as reported by the provider.
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API key not configured")]
    ConfigMissing,
    #[error("API error: {status} - {message}")]
    RemoteApi { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("File type {0} is not supported")]
    UnsupportedMediaKind(String),
    #[error("Session is busy with another request")]
    Busy,
    #[error("I/O error: {0}")]
    Io(String),
}
