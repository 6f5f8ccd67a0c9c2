//! Conversion of compile messages into bundler-style diagnostics.

use serde::Serialize;

use crate::compile::{Message, MessageKind};

/// A diagnostic as reported to build tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMessage {
    /// Severity level
    pub kind: MessageKind,

    /// Human-readable text
    pub text: String,

    /// Where in the component the problem is, if the compiler said
    pub location: Option<BuildLocation>,
}

/// Source position of a [`BuildMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLocation {
    /// Component file name as passed to the compiler
    pub file: String,

    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (0-indexed)
    pub column: usize,

    /// Source text of the offending line
    pub line_text: String,

    /// Length of the highlighted range in characters
    pub length: usize,
}

/// Convert the messages of one `kind` into build messages, keeping order.
pub fn convert_messages(messages: &[Message], kind: MessageKind) -> Vec<BuildMessage> {
    messages
        .iter()
        .filter(|m| m.kind == kind)
        .map(BuildMessage::from_message)
        .collect()
}

/// Extract the source text of `line` from a compiler code frame.
///
/// Frames number each line (`"12: <div>"`, sometimes padded as `" 9: "`).
/// Falls back to the whole frame when the line is not in it.
pub fn find_line_text(frame: &str, line: usize) -> &str {
    let prefix = format!("{line}: ");
    frame
        .split('\n')
        .find_map(|src_line| src_line.trim_start().strip_prefix(prefix.as_str()))
        .unwrap_or(frame)
}

impl BuildMessage {
    pub fn from_message(message: &Message) -> Self {
        let location = message.start().map(|start| {
            let length = message
                .end()
                .map(|end| end.character.saturating_sub(start.character))
                .unwrap_or(0);
            BuildLocation {
                file: message.filename().unwrap_or_default().to_string(),
                line: start.line,
                column: start.column,
                line_text: find_line_text(message.frame().unwrap_or_default(), start.line)
                    .to_string(),
                length,
            }
        });

        Self {
            kind: message.kind,
            text: message.message.clone(),
            location,
        }
    }

    /// Format the message for terminal display.
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let level_str = match self.kind {
            MessageKind::Error => "\x1b[1;31merror\x1b[0m",
            MessageKind::Warning => "\x1b[1;33mwarning\x1b[0m",
        };
        output.push_str(&format!("{level_str}: {}\n", self.text));

        if let Some(loc) = &self.location {
            output.push_str(&format!(
                "  \x1b[1;34m-->\x1b[0m {}:{}:{}\n",
                loc.file, loc.line, loc.column
            ));
            if !loc.line_text.is_empty() {
                output.push_str(&format!("   \x1b[1;34m|\x1b[0m {}\n", loc.line_text));
            }
        }

        output
    }

    /// Format the message without escape codes.
    pub fn format_plain(&self) -> String {
        let mut output = format!("{}: {}\n", self.kind.as_str(), self.text);
        if let Some(loc) = &self.location {
            output.push_str(&format!("  --> {}:{}:{}\n", loc.file, loc.line, loc.column));
        }
        output
    }
}
