//! Bridge to the Svelte compiler running in a node worker process.
//!
//! This module provides the JSON-lines protocol and [`NodeCompiler`], the
//! [`ComponentCompiler`](crate::compile::ComponentCompiler) backed by it.

pub mod protocol;
mod worker;

pub use protocol::{WorkerCommand, WorkerResponse, read_message, write_message};
pub use worker::NodeCompiler;
