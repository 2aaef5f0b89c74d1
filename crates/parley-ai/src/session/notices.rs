//! Fixed assistant-role notices shown to the user but never sent to the model.

pub const WELCOME: &str = "Welcome! To get started, please enter your OpenRouter API key in \
the settings. This will enable real AI responses powered by GPT-4o.";

pub const SETTINGS_SAVED: &str =
    "Configuration saved! You can now chat with real AI intelligence.";
pub const SETTINGS_NEED_KEY: &str = "Please enter a valid API key to enable AI responses.";

pub const CHAT_NEEDS_KEY: &str = "Please configure your API key first to enable AI responses.";
pub const ATTACH_NEEDS_KEY: &str =
    "Please configure your API key first to enable file analysis.";
pub const SEARCH_NEEDS_KEY: &str =
    "Please configure your API key first to enable search functionality.";

pub const CHAT_FAILED: &str = "Sorry, I encountered an error while processing your request. \
Please check your API key and try again.";
pub const IMAGE_FAILED: &str = "Sorry, I couldn't analyze the image. Please try again.";
pub const TEXT_FAILED: &str = "Sorry, I couldn't analyze the text file. Please try again.";
pub const FILE_FAILED: &str = "Sorry, I encountered an error while processing the file.";

pub fn analyzing_file(file_name: &str) -> String {
    format!("Analyzing file: {file_name}")
}

pub fn unsupported_file(media_type: &str) -> String {
    format!(
        "File type {media_type} is not yet supported for analysis. \
         Currently supported: images and text files."
    )
}

pub fn search_request(query: &str) -> String {
    format!("Search for information about: {query}")
}
