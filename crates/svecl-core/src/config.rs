//! Configuration for the compiler bridge.

use std::path::PathBuf;

/// File name of the compiler entry point inside a Svelte distribution.
pub const COMPILER_SCRIPT: &str = "compiler.js";

/// Environment variable overriding node discovery.
pub const NODE_ENV_VAR: &str = "SVECL_NODE";

/// Configuration for compiler workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Path to the node binary. If None, uses `SVECL_NODE` or `PATH`.
    pub node_path: Option<PathBuf>,

    /// Directory of a Svelte distribution whose `compiler.js` is used
    /// instead of the `svelte/compiler` module node resolves.
    pub svelte_path: Option<PathBuf>,

    /// Number of compiler workers kept by a pool
    pub pool_size: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            node_path: None,
            svelte_path: None,
            pool_size: default_pool_size(),
        }
    }
}

impl CompilerConfig {
    /// Use the Svelte distribution at `path`.
    pub fn with_svelte_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.svelte_path = Some(path.into());
        self
    }

    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size.max(1);
        self
    }

    /// The compiler script to load, if a distribution directory is configured.
    pub fn compiler_script(&self) -> Option<PathBuf> {
        self.svelte_path.as_ref().map(|dir| dir.join(COMPILER_SCRIPT))
    }
}

fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
