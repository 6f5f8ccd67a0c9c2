//! Failures raised by the external compiler.

use serde_json::Value;

use super::types::Record;

/// Category of a compiler failure, derived from its `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The component source could not be parsed.
    Parse,
    /// The component parsed but is not valid.
    Validation,
    /// Anything else, including internal compiler faults.
    Other(String),
}

impl FailureKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ParseError" => FailureKind::Parse,
            "ValidationError" => FailureKind::Validation,
            other => FailureKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FailureKind::Parse => "ParseError",
            FailureKind::Validation => "ValidationError",
            FailureKind::Other(name) => name,
        }
    }

    /// Whether failures of this kind are reported as diagnostics.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, FailureKind::Parse | FailureKind::Validation)
    }
}

/// A failure raised by the external compiler.
///
/// `fields` carries the failure's own properties (code, start, end, frame,
/// ...) exactly as the compiler produced them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}: {message}", .kind.name())]
pub struct CompilerFailure {
    pub kind: FailureKind,
    pub message: String,
    pub fields: Record,
}

impl CompilerFailure {
    pub fn new(name: &str, message: impl Into<String>, fields: Record) -> Self {
        Self {
            kind: FailureKind::from_name(name),
            message: message.into(),
            fields,
        }
    }

    /// Compiler diagnostic code, when the failure carries one.
    pub fn code(&self) -> Option<&str> {
        self.fields.get("code").and_then(Value::as_str)
    }
}
