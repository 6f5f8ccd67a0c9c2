//! Node.js worker process hosting the Svelte compiler.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use rayon::prelude::*;

use crate::compile::{CompilerFailure, CompilerOptions, CompilerOutput, ComponentCompiler};
use crate::config::{CompilerConfig, NODE_ENV_VAR};
use crate::error::{Error, Result};
use crate::pool::CompilerPool;

use super::protocol::{WorkerCommand, WorkerResponse, read_message, write_message};

/// Script evaluated by node; answers [`WorkerCommand`]s on stdout.
const DRIVER_SCRIPT: &str = include_str!("driver.js");

/// A Svelte compiler running in a dedicated node process.
///
/// One compile is in flight at a time; use a [`CompilerPool`] for
/// parallel compilation.
pub struct NodeCompiler {
    /// The child process.
    child: Child,
    /// Buffered stdin writer.
    stdin: BufWriter<ChildStdin>,
    /// Buffered stdout reader.
    stdout: BufReader<ChildStdout>,
    /// Whether the worker has been killed.
    killed: bool,
}

impl NodeCompiler {
    /// Spawn a worker and load the configured Svelte compiler into it.
    pub fn spawn(config: &CompilerConfig) -> Result<Self> {
        let compiler_path = match config.compiler_script() {
            Some(script) => {
                if !script.is_file() {
                    return Err(Error::Toolchain(format!(
                        "Svelte compiler not found at {}",
                        script.display()
                    )));
                }
                Some(script.to_string_lossy().to_string())
            }
            None => None,
        };

        let node = Self::find_node(config.node_path.as_deref())?;
        tracing::debug!("Spawning compiler worker with {}", node.display());

        let mut child = Command::new(&node)
            .arg("--eval")
            .arg(DRIVER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit()) // Let worker stderr pass through for debugging
            .spawn()
            .map_err(|e| {
                Error::Ipc(format!(
                    "Failed to spawn compiler worker '{}': {}",
                    node.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Ipc("Failed to get worker stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Ipc("Failed to get worker stdout".to_string()))?;

        let mut worker = Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            killed: false,
        };

        // Verify worker is alive with a ping
        match worker.request(&WorkerCommand::Ping)? {
            WorkerResponse::Pong => {}
            other => {
                return Err(Error::Protocol(format!(
                    "Unexpected response from worker: {:?}",
                    other
                )));
            }
        }

        match worker.request(&WorkerCommand::Init { compiler_path })? {
            WorkerResponse::Ready => {
                tracing::debug!("Compiler worker {} ready", worker.pid());
                Ok(worker)
            }
            WorkerResponse::Error { message } => Err(Error::Toolchain(format!(
                "Failed to load Svelte compiler: {}",
                message
            ))),
            other => Err(Error::Protocol(format!(
                "Unexpected response when loading compiler: {:?}",
                other
            ))),
        }
    }

    /// Create a pool of `config.pool_size` workers, spawned in parallel.
    ///
    /// Workers that exit are replaced on the next checkout.
    pub fn pool(config: &CompilerConfig) -> Result<CompilerPool<NodeCompiler>> {
        let size = config.pool_size.max(1);
        tracing::debug!("Starting {} compiler workers", size);

        let workers = (0..size)
            .into_par_iter()
            .map(|_| Self::spawn(config))
            .collect::<Result<Vec<_>>>()?;

        let config = config.clone();
        Ok(CompilerPool::with_respawn(workers, move || Self::spawn(&config)))
    }

    /// Find the node binary.
    ///
    /// Looks in the following order:
    /// 1. An explicitly configured path
    /// 2. `SVECL_NODE` environment variable
    /// 3. System PATH
    fn find_node(configured: Option<&Path>) -> Result<PathBuf> {
        Self::locate_node(configured, std::env::var_os(NODE_ENV_VAR).map(PathBuf::from))
    }

    fn locate_node(configured: Option<&Path>, from_env: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = configured {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(Error::Toolchain(format!(
                "node not found at {}",
                path.display()
            )));
        }

        if let Some(path) = from_env {
            if path.exists() {
                return Ok(path);
            }
            tracing::warn!("{} points at missing {}", NODE_ENV_VAR, path.display());
        }

        which::which("node").map_err(|_| {
            Error::Toolchain(format!(
                "node not found in PATH. Install Node.js or set {}.",
                NODE_ENV_VAR
            ))
        })
    }

    /// Send a command and wait for its response.
    ///
    /// A failed exchange leaves the stream out of step with the commands
    /// sent, so the worker is killed and refuses any further request.
    fn request(&mut self, cmd: &WorkerCommand) -> Result<WorkerResponse> {
        if self.killed {
            return Err(Error::Ipc("Worker has been killed".to_string()));
        }

        let response =
            write_message(&mut self.stdin, cmd).and_then(|()| read_message(&mut self.stdout));
        if let Err(e) = &response {
            tracing::warn!("Discarding compiler worker {}: {}", self.pid(), e);
            self.kill();
        }
        response
    }

    /// Version of the Svelte compiler loaded in this worker.
    pub fn version(&mut self) -> Result<String> {
        match self.request(&WorkerCommand::Version)? {
            WorkerResponse::Version { version } => Ok(version),
            WorkerResponse::Error { message } => Err(Error::Ipc(message)),
            other => Err(Error::Protocol(format!(
                "Unexpected response when asking for version: {:?}",
                other
            ))),
        }
    }

    /// Check if the worker process is still running.
    pub fn is_alive(&mut self) -> bool {
        if self.killed {
            return false;
        }
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Get the process ID of the worker.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Kill the worker process immediately.
    pub fn kill(&mut self) {
        if self.killed {
            return;
        }

        // Try graceful shutdown first, then force
        let _ = write_message(&mut self.stdin, &WorkerCommand::Shutdown);
        std::thread::sleep(Duration::from_millis(10));
        self.killed = true;

        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                tracing::warn!("Failed to kill compiler worker: {}", e);
            }
        }

        // Wait to reap zombie
        let _ = self.child.wait();
    }

    /// Graceful shutdown - ask worker to exit cleanly.
    pub fn shutdown(mut self) -> Result<()> {
        let response = self.request(&WorkerCommand::Shutdown);
        self.killed = true;

        match self.child.wait() {
            Ok(status) if status.success() => match response {
                Ok(WorkerResponse::ShuttingDown) => Ok(()),
                Ok(other) => Err(Error::Protocol(format!(
                    "Unexpected response to shutdown: {:?}",
                    other
                ))),
                Err(e) => Err(e),
            },
            Ok(status) => Err(Error::Ipc(format!("Worker exited with status: {}", status))),
            Err(e) => Err(Error::Ipc(format!("Failed to wait for worker: {}", e))),
        }
    }
}

impl ComponentCompiler for NodeCompiler {
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput> {
        tracing::debug!(
            "Compiling {} in worker {}",
            options.filename().unwrap_or("<anonymous>"),
            self.pid()
        );

        let cmd = WorkerCommand::Compile {
            source: source.to_string(),
            options: options.clone(),
        };

        match self.request(&cmd)? {
            WorkerResponse::Compiled {
                code,
                map,
                warnings,
            } => Ok(CompilerOutput {
                code,
                map,
                warnings,
            }),
            WorkerResponse::Failed {
                name,
                message,
                fields,
            } => Err(CompilerFailure::new(&name, message, fields).into()),
            WorkerResponse::Error { message } => Err(Error::Ipc(message)),
            other => Err(Error::Protocol(format!(
                "Unexpected response when compiling: {:?}",
                other
            ))),
        }
    }

    fn is_healthy(&mut self) -> bool {
        self.is_alive()
    }
}

impl Drop for NodeCompiler {
    fn drop(&mut self) {
        // Ensure worker is killed when handle is dropped
        self.kill();
    }
}
