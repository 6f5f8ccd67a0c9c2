//! Source-map rendering for generated component code.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of the comment that links generated code to its source map.
pub const SOURCE_MAPPING_URL_PREFIX: &str = "//# sourceMappingURL=";

const DATA_URL_PREFIX: &str = "data:application/json;charset=utf-8;base64,";

/// A source map produced by the compiler, kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap(Value);

impl SourceMap {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Render as a base64 `data:` URL suitable for a `sourceMappingURL` comment.
    pub fn to_url(&self) -> String {
        format!("{DATA_URL_PREFIX}{}", STANDARD.encode(self.0.to_string()))
    }
}

/// `code` followed by a newline and the `sourceMappingURL` comment.
pub fn append_source_map_comment(code: &str, map_url: &str) -> String {
    format!("{code}\n{SOURCE_MAPPING_URL_PREFIX}{map_url}")
}
