//! Markdown-ish formatting of turn text into display markup.
//!
//! Four regex substitutions run in a fixed order: bold, italic, inline
//! code, then newlines. Nothing is escaped and substitutions are not
//! layered, so a code span's `*` characters are still seen by the
//! emphasis passes that ran before it.

use std::sync::LazyLock;

use regex::Regex;

use crate::Turn;

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Render a turn's text content to markup.
pub fn render(turn: &Turn) -> String {
    format_text(&turn.text_content())
}

/// Apply the markup substitutions to raw text.
pub fn format_text(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "<strong>$1</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>$1</em>");
    let text = CODE_RE.replace_all(&text, "<code>$1</code>");
    text.replace('\n', "<br>")
}
