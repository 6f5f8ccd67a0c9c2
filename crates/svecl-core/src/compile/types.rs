//! Request, result and message types for the compile adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::failure::CompilerFailure;
use super::source_map::{SourceMap, append_source_map_comment};

/// A JSON record with no fixed schema (warnings, failure payloads).
pub type Record = Map<String, Value>;

/// Options forwarded verbatim to the external compiler.
///
/// The shape is defined by the compiler, not by svecl. Unknown keys are
/// never dropped or validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerOptions(Record);

impl CompilerOptions {
    /// Empty options (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a `filename`.
    pub fn with_filename(filename: impl Into<String>) -> Self {
        let mut options = Self::new();
        options.set("filename", Value::String(filename.into()));
        options
    }

    /// Set (or replace) an option.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `filename` option, if present and a string.
    pub fn filename(&self) -> Option<&str> {
        self.0.get("filename").and_then(Value::as_str)
    }

    /// Parse a `key=value` assignment as given on the command line.
    ///
    /// The value is read as JSON when it parses (`dev=true`, `css="none"`,
    /// `compatibility={"componentApi":4}`), otherwise it is kept as a plain
    /// string (`css=injected`).
    pub fn parse_assignment(assignment: &str) -> Option<(String, Value)> {
        let (key, raw) = assignment.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Some((key.to_string(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Record> for CompilerOptions {
    fn from(map: Record) -> Self {
        Self(map)
    }
}

/// A single compile call: source text plus options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub source: String,
    pub options: CompilerOptions,
}

impl CompileRequest {
    pub fn new(source: impl Into<String>, options: CompilerOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }
}

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Warning,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
        }
    }
}

/// A position inside the component source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (0-indexed)
    pub column: usize,

    /// Character offset from the start of the source
    pub character: usize,
}

/// A warning or error reported by the compiler.
///
/// `fields` holds every other property of the compiler's record, untouched.
/// Serializes flat: `{ "type": ..., "message": ..., ...fields }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,

    #[serde(default)]
    pub message: String,

    #[serde(flatten)]
    pub fields: Record,
}

impl Message {
    /// Build a message from a compiler record, setting `type` to `kind`.
    ///
    /// A `type` already present in the record is overridden.
    pub fn from_record(kind: MessageKind, mut record: Record) -> Self {
        record.remove("type");
        let message = match record.remove("message") {
            Some(Value::String(text)) => text,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            kind,
            message,
            fields: record,
        }
    }

    /// Build the single error message for a recognized compiler failure.
    pub fn from_failure(failure: CompilerFailure) -> Self {
        let mut fields = failure.fields;
        fields.remove("type");
        fields.remove("message");
        Self {
            kind: MessageKind::Error,
            message: failure.message,
            fields,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    /// Compiler diagnostic code (e.g. `a11y-missing-attribute`).
    pub fn code(&self) -> Option<&str> {
        self.str_field("code")
    }

    pub fn filename(&self) -> Option<&str> {
        self.str_field("filename")
    }

    /// Code frame around the reported position, with numbered lines.
    pub fn frame(&self) -> Option<&str> {
        self.str_field("frame")
    }

    pub fn start(&self) -> Option<Location> {
        self.location_field("start")
    }

    pub fn end(&self) -> Option<Location> {
        self.location_field("end")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn location_field(&self, key: &str) -> Option<Location> {
        let value = self.fields.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// What the external compiler hands back on success.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOutput {
    /// Generated JavaScript
    pub code: String,

    /// Source map for `code`
    pub map: SourceMap,

    /// Warning records, in the order the compiler reported them
    pub warnings: Vec<Record>,
}

/// Normalized outcome of a compile call.
///
/// `code` is `Some` exactly when compilation succeeded; `None` means
/// `messages` holds the single error that stopped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub code: Option<String>,
    pub messages: Vec<Message>,
}

impl CompileResult {
    /// Success: code with its source-map comment, warnings as messages.
    pub fn from_output(output: CompilerOutput) -> Self {
        let code = append_source_map_comment(&output.code, &output.map.to_url());
        let messages = output
            .warnings
            .into_iter()
            .map(|w| Message::from_record(MessageKind::Warning, w))
            .collect();
        Self {
            code: Some(code),
            messages,
        }
    }

    /// Recognized failure: no code, one error message.
    pub fn from_failure(failure: CompilerFailure) -> Self {
        Self {
            code: None,
            messages: vec![Message::from_failure(failure)],
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_error())
    }
}
