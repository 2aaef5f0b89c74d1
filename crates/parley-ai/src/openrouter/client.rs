//! OpenRouter client struct, request building, and response parsing.

use crate::{AiError, AiResponse, ContentPart, TokenUsage, Turn};

use super::config::OpenRouterConfig;

/// OpenRouter API client.
pub struct OpenRouterClient {
    pub(crate) config: OpenRouterConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Build the JSON request body for the chat-completions API.
    pub(crate) fn build_request_body(&self, turns: &[Turn], max_tokens: u32) -> serde_json::Value {
        let messages: Vec<_> = turns
            .iter()
            .map(|turn| {
                let content: Vec<_> = turn.content.iter().map(content_part_json).collect();
                serde_json::json!({
                    "role": turn.role.as_str(),
                    "content": content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": max_tokens,
            "stream": false,
        })
    }

    /// Parse a successful response, taking the first choice's text.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                AiError::Parse("missing choices[0].message.content in response".to_string())
            })?;

        let model = json["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse {
            content,
            model,
            usage,
        })
    }
}

fn content_part_json(part: &ContentPart) -> serde_json::Value {
    match part {
        ContentPart::Text { value } => serde_json::json!({
            "type": "text",
            "text": value,
        }),
        ContentPart::Image { .. } => serde_json::json!({
            "type": "image_url",
            "image_url": { "url": part.data_url() },
        }),
    }
}

/// Extract the provider's `error.message` from an error body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| "Unknown error".to_string())
}
