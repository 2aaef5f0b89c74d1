//! Input line parsing.
//!
//! Plain lines are chat messages; lines starting with `/` are commands.

use std::path::PathBuf;

pub const HELP: &str = "\
Type a message and press Enter to chat.

  /attach <file>...   analyse image or text files (quote paths with spaces)
  /search <query>     ask about a topic
  /voice <audio>      transcribe an audio file and send it
  /key <api-key>      save your OpenRouter API key
  /prompt <text>      save a new system prompt
  /settings           show current settings
  /usage              show token usage
  /reset              clear the conversation
  /help               show this help
  /quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Attach(Vec<PathBuf>),
    Search(String),
    Voice(PathBuf),
    Key(String),
    Prompt(String),
    Settings,
    Usage,
    Reset,
    Help,
    Quit,
    /// A `/command` that is unknown or missing its argument.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Chat(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name, arg) {
            ("attach", "") => Command::Invalid("usage: /attach <file>...".into()),
            ("attach", arg) => match split_paths(arg) {
                Some(paths) => Command::Attach(paths),
                None => Command::Invalid("unterminated quote in /attach".into()),
            },
            ("search", "") => Command::Invalid("usage: /search <query>".into()),
            ("search", arg) => Command::Search(arg.to_string()),
            ("voice", "") => Command::Invalid("usage: /voice <audio-file>".into()),
            ("voice", arg) => Command::Voice(PathBuf::from(arg)),
            // An empty key is allowed: saving it clears the stored key.
            ("key", arg) => Command::Key(arg.to_string()),
            ("prompt", "") => Command::Invalid("usage: /prompt <text>".into()),
            ("prompt", arg) => Command::Prompt(arg.to_string()),
            ("settings", _) => Command::Settings,
            ("usage", _) => Command::Usage,
            ("reset", _) => Command::Reset,
            ("help", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            (other, _) => Command::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

/// Split on whitespace, keeping `"..."` and `'...'` spans together.
///
/// Returns `None` when a quote is left open.
fn split_paths(arg: &str) -> Option<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = None;

    for c in arg.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if in_word {
        paths.push(PathBuf::from(current));
    }
    Some(paths)
}
