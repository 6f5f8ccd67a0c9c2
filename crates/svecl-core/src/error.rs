//! Error types for svecl-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::compile::CompilerFailure;

/// Result type for svecl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in svecl-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The external compiler raised a failure.
    ///
    /// Parse and validation failures never escape [`crate::compile::compile`];
    /// any other category is surfaced here unchanged.
    #[error(transparent)]
    Compiler(#[from] CompilerFailure),

    /// Node.js (or the Svelte compiler it should load) could not be found.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// IPC communication error with the compiler worker.
    #[error("IPC error: {0}")]
    Ipc(String),

    /// The worker answered with something the protocol does not allow here.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Failed to read a component or import map.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unsupported import map.
    #[error("invalid import map: {0}")]
    ImportMap(String),

    /// No import map entry matches the specifier.
    #[error("unable to resolve specifier '{0}'")]
    UnresolvedSpecifier(String),

    /// Compiler pool lock poisoned.
    #[error("pool error: {0}")]
    Pool(String),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error with a recovery hint where one is known.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::Toolchain(_) => Some(
                "install Node.js or point SVECL_NODE at a node binary; \
                 pass --svelte=<dir> if svelte/compiler is not resolvable",
            ),
            Error::ImportMap(_) => Some("only top-level \"imports\" are supported"),
            Error::Ipc(_) => Some("rerun with --verbose to see worker output"),
            _ => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }

    /// Whether this error is a compiler failure (as opposed to a host fault).
    pub fn is_compiler_failure(&self) -> bool {
        matches!(self, Error::Compiler(_))
    }
}
