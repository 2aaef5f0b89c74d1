//! AiClient trait implementation for OpenRouterClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiClient, AiError, AiResponse, Turn};

use super::client::{error_message, OpenRouterClient};

#[async_trait]
impl AiClient for OpenRouterClient {
    async fn send_message(
        &self,
        api_key: &str,
        turns: &[Turn],
        max_tokens: u32,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(turns, max_tokens);

        debug!(
            model = %self.config.model,
            turns = turns.len(),
            max_tokens,
            "OpenRouter request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::RemoteApi {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        self.parse_response(json)
    }
}
