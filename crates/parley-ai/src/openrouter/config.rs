//! OpenRouter client configuration.

/// Chat-completions endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// OpenRouter client configuration.
///
/// The bearer token is not part of this struct: it is read from the
/// session settings on every request.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    /// Client origin, sent as `HTTP-Referer`.
    pub referer: String,
    /// Client identifier, sent as `X-Title`.
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenRouterConfig {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            referer: "http://localhost".to_string(),
            title: "parley".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
