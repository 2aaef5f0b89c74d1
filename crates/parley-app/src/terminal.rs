//! Terminal implementation of the display surface.
//!
//! The session hands over HTML-ish markup; here the four tags it can
//! produce are mapped onto ANSI styles. Markup is not escaped upstream, so
//! a literal `<em>` typed by the user or the model is styled the same way.

use std::io::Write;

use parley_ai::{Role, Surface};

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const CODE: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const CLEAR_LINE: &str = "\r\x1b[2K";

pub struct TerminalSurface {
    color: bool,
}

impl TerminalSurface {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn write(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Surface for TerminalSurface {
    fn show(&self, role: Role, markup: &str) {
        let label = match role {
            Role::User => "you",
            Role::Assistant => "parley",
            Role::System => "system",
        };
        let body = to_ansi(markup, self.color);
        if self.color {
            self.write(&format!("{BOLD}{label}>{RESET} {body}\n\n"));
        } else {
            self.write(&format!("{label}> {body}\n\n"));
        }
    }

    fn pending_started(&self) {
        if self.color {
            self.write(&format!("{DIM}Thinking...{RESET}"));
        } else {
            self.write("Thinking...");
        }
    }

    fn pending_finished(&self) {
        if self.color {
            self.write(CLEAR_LINE);
        } else {
            self.write("\n");
        }
    }
}

/// Translate rendered markup into terminal text.
pub fn to_ansi(markup: &str, color: bool) -> String {
    let (bold, italic, code, reset) = if color {
        (BOLD, ITALIC, CODE, RESET)
    } else {
        ("", "", "", "")
    };
    markup
        .replace("<br>", "\n")
        .replace("<strong>", bold)
        .replace("<em>", italic)
        .replace("<code>", code)
        .replace("</strong>", reset)
        .replace("</em>", reset)
        .replace("</code>", reset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_strips_tags() {
        assert_eq!(
            to_ansi("<strong>Hi</strong><br>run <code>ls</code>", false),
            "Hi\nrun ls"
        );
    }

    #[test]
    fn color_mode_uses_escape_codes() {
        assert_eq!(to_ansi("<em>x</em>", true), "\x1b[3mx\x1b[0m");
    }

    #[test]
    fn literal_tags_in_text_are_styled_too() {
        assert_eq!(to_ansi("type <code>&lt;</code> or <em>", false), "type &lt; or ");
    }

    #[test]
    fn other_html_is_left_alone() {
        assert_eq!(to_ansi("<b>x</b>", false), "<b>x</b>");
    }
}
