//! Loader for `.svelte` component files.
//!
//! Reads a component from disk, compiles it with a pooled compiler and
//! splits the messages into errors and warnings for build tooling.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;

use crate::compile::{CompileResult, CompilerOptions, ComponentCompiler, MessageKind};
use crate::diagnostics::{BuildMessage, convert_messages};
use crate::error::{Error, Result};
use crate::pool::CompilerPool;

/// File extension of Svelte components.
pub const COMPONENT_EXTENSION: &str = "svelte";

/// Whether `path` names a Svelte component.
pub fn is_component(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == COMPONENT_EXTENSION)
}

/// Outcome of loading one component.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// Compiled JavaScript, `None` if the component has errors
    pub contents: Option<String>,
    pub errors: Vec<BuildMessage>,
    pub warnings: Vec<BuildMessage>,
}

impl LoadResult {
    pub fn from_compile_result(result: &CompileResult) -> Self {
        Self {
            contents: result.code.clone(),
            errors: convert_messages(&result.messages, MessageKind::Error),
            warnings: convert_messages(&result.messages, MessageKind::Warning),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Compiles component files through a compiler pool.
pub struct ComponentLoader<C> {
    pool: CompilerPool<C>,
    /// Options applied to every component; `filename` is set per file.
    options: CompilerOptions,
}

impl<C: ComponentCompiler + Send> ComponentLoader<C> {
    pub fn new(pool: CompilerPool<C>) -> Self {
        Self {
            pool,
            options: CompilerOptions::new(),
        }
    }

    /// Use `options` as the base options for every component.
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Options used for the component at `path`.
    pub fn options_for(&self, path: &Path) -> CompilerOptions {
        let mut options = self.options.clone();
        if let Some(name) = path.file_name() {
            options.set("filename", Value::String(name.to_string_lossy().to_string()));
        }
        options
    }

    /// Compile the component at `path`, returning the normalized result.
    pub fn compile_file(&self, path: &Path) -> Result<CompileResult> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loading component {}", path.display());
        self.pool.compile(&source, &self.options_for(path))
    }

    /// Compile the component at `path` into a [`LoadResult`].
    pub fn load_file(&self, path: &Path) -> Result<LoadResult> {
        let result = self.compile_file(path)?;
        Ok(LoadResult::from_compile_result(&result))
    }

    /// Load many components in parallel, preserving input order.
    pub fn load_all(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<LoadResult>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.load_file(path)))
            .collect()
    }
}
