//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# parley configuration
# Only override what you want to change -- missing fields use defaults.

# OpenRouter API key (https://openrouter.ai/keys). Stored in cleartext.
openrouter_api_key = ""

# system_prompt = "You are ChatGPT, a large language model trained by OpenAI. ..."

[provider]
# endpoint = "https://openrouter.ai/api/v1/chat/completions"
# model = "openai/gpt-4o"
# referer = "http://localhost"   # sent as HTTP-Referer
# title = "parley"               # sent as X-Title

[voice]
# api_key = ""                   # OpenAI key for Whisper; falls back to OPENAI_API_KEY
# model = "whisper-1"
# language = "en"

[logging]
# level = "info"                 # trace, debug, info, warn, error
"##
    .to_string()
}
