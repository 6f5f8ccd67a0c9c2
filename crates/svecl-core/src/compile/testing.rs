//! Deterministic stand-in for the Svelte compiler, used by unit tests.

use serde_json::{Value, json};

use super::adapter::ComponentCompiler;
use super::failure::CompilerFailure;
use super::source_map::SourceMap;
use super::types::{CompilerOptions, CompilerOutput, Record};
use crate::error::{Error, Result};

/// Fake compiler with scripted behavior:
///
/// - source containing `<!die` takes the compiler down; it fails with an
///   IPC error now and on every later call
/// - source containing `<!crash` fails with a `TypeError`
/// - source starting with `<svelte:invalid` fails with a `ValidationError`
/// - source not ending in `>` fails with a `ParseError` at its end
/// - otherwise succeeds, warning once per line containing `<img`
#[derive(Debug, Default)]
pub struct FakeCompiler {
    calls: usize,
    last_options: Option<CompilerOptions>,
    dead: bool,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn last_options(&self) -> Option<&CompilerOptions> {
        self.last_options.as_ref()
    }

    /// The code this fake generates for `source`.
    pub fn generated(source: &str) -> String {
        format!(
            "/* generated from {} bytes */\nexport default class Component {{}}",
            source.len()
        )
    }

    fn object(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    fn warnings(source: &str, filename: Option<&str>) -> Vec<Record> {
        let mut offset = 0;
        let mut warnings = Vec::new();
        for (idx, line) in source.split('\n').enumerate() {
            if line.contains("<img") {
                let mut warning = Self::object(json!({
                    "code": "a11y-missing-attribute",
                    "message": "A11y: <img> element should have an alt attribute",
                    "start": { "line": idx + 1, "column": 0, "character": offset },
                    "end": { "line": idx + 1, "column": line.len(), "character": offset + line.len() },
                    "frame": format!("{}: {}", idx + 1, line),
                    "index": warnings.len(),
                }));
                if let Some(name) = filename {
                    warning.insert("filename".to_string(), json!(name));
                }
                warnings.push(warning);
            }
            offset += line.len() + 1;
        }
        warnings
    }
}

impl ComponentCompiler for FakeCompiler {
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput> {
        self.calls += 1;
        self.last_options = Some(options.clone());
        let filename = options.filename();

        if self.dead || source.contains("<!die") {
            self.dead = true;
            return Err(Error::Ipc("Worker closed its output".to_string()));
        }

        if source.contains("<!crash") {
            return Err(CompilerFailure::new(
                "TypeError",
                "Cannot read properties of undefined",
                Record::new(),
            )
            .into());
        }

        if source.starts_with("<svelte:invalid") {
            let fields = Self::object(json!({
                "name": "ValidationError",
                "code": "invalid-tag",
                "start": { "line": 1, "column": 1, "character": 1 },
                "end": { "line": 1, "column": 15, "character": 15 },
                "frame": format!("1: {source}"),
            }));
            return Err(CompilerFailure::new("ValidationError", "Unknown svelte: tag", fields).into());
        }

        let trimmed = source.trim_end();
        if !trimmed.ends_with('>') {
            let line = trimmed.split('\n').count();
            let column = trimmed.rsplit('\n').next().map_or(0, str::len);
            let mut fields = Self::object(json!({
                "name": "ParseError",
                "code": "unexpected-eof",
                "start": { "line": line, "column": column, "character": trimmed.len() },
                "pos": trimmed.len(),
                "frame": format!("{}: {}", line, trimmed.rsplit('\n').next().unwrap_or("")),
            }));
            if let Some(name) = filename {
                fields.insert("filename".to_string(), json!(name));
            }
            return Err(CompilerFailure::new("ParseError", "Expected >", fields).into());
        }

        let sources: Vec<&str> = filename.into_iter().collect();
        Ok(CompilerOutput {
            code: Self::generated(source),
            map: SourceMap::new(json!({ "version": 3, "sources": sources, "mappings": "AAAA" })),
            warnings: Self::warnings(source, filename),
        })
    }

    fn is_healthy(&mut self) -> bool {
        !self.dead
    }
}
