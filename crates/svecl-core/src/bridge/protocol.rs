//! IPC protocol messages for compiler worker processes.
//!
//! Uses newline-delimited JSON over stdin/stdout: one object per line,
//! tagged by `op` (commands) or `type` (responses).

use std::io::{BufRead, Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::compile::{CompilerOptions, Record, SourceMap};
use crate::error::{Error, Result};

/// Upper bound for a single message line (64 MiB).
pub const MAX_MESSAGE_LEN: usize = 64 * 1024 * 1024;

/// Command sent from parent to worker process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorkerCommand {
    /// Ping to check if worker is alive.
    Ping,

    /// Load the Svelte compiler.
    Init {
        /// Path to a `compiler.js`; `None` loads `svelte/compiler`.
        compiler_path: Option<String>,
    },

    /// Compile one component.
    Compile {
        source: String,
        options: CompilerOptions,
    },

    /// Ask for the loaded compiler's version.
    Version,

    /// Shutdown the worker process gracefully.
    Shutdown,
}

/// Response sent from worker to parent process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerResponse {
    /// Response to Ping command.
    Pong,

    /// Compiler loaded.
    Ready,

    /// Compilation succeeded.
    Compiled {
        code: String,
        map: SourceMap,
        #[serde(default)]
        warnings: Vec<Record>,
    },

    /// The compiler threw.
    Failed {
        name: String,
        message: String,
        #[serde(default)]
        fields: Record,
    },

    /// Compiler version string.
    Version { version: String },

    /// The worker itself failed to handle a command.
    Error { message: String },

    /// Acknowledgement of shutdown request.
    ShuttingDown,
}

/// Write a message as one JSON line and flush.
pub fn write_message<W: Write>(writer: &mut W, message: &impl Serialize) -> Result<()> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');

    writer
        .write_all(&line)
        .map_err(|e| Error::Ipc(format!("Failed to write IPC message: {}", e)))?;
    writer
        .flush()
        .map_err(|e| Error::Ipc(format!("Failed to flush IPC stream: {}", e)))?;

    Ok(())
}

/// Read one JSON line and decode it.
///
/// After an error the reader is left mid-stream and must not be reused.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    read_limited(reader, MAX_MESSAGE_LEN)
}

fn read_limited<R: BufRead, T: DeserializeOwned>(reader: &mut R, limit: usize) -> Result<T> {
    let mut line = String::new();
    let read = reader
        .by_ref()
        .take(limit as u64 + 1)
        .read_line(&mut line)
        .map_err(|e| Error::Ipc(format!("Failed to read IPC message: {}", e)))?;

    if read == 0 {
        return Err(Error::Ipc("Worker closed its output".to_string()));
    }
    if read > limit {
        return Err(Error::Ipc(format!(
            "IPC message too large: more than {} bytes",
            limit
        )));
    }

    serde_json::from_str(line.trim_end())
        .map_err(|e| Error::Protocol(format!("Failed to decode IPC message: {}", e)))
}
