//! OpenRouter chat-completions client.
//!
//! Implements the `AiClient` trait against the OpenAI-compatible
//! `/api/v1/chat/completions` endpoint. Requests are never streamed and
//! failures are never retried.

mod api;
mod client;
mod config;


pub(crate) use client::error_message;
pub use client::OpenRouterClient;
pub use config::{OpenRouterConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
