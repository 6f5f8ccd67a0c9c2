//! Core library for svecl, a Svelte component compiler front end.
//!
//! This crate provides:
//! - The compile adapter that normalizes Svelte compiler output
//! - A node worker bridge hosting the Svelte compiler
//! - A compiler pool and a loader for `.svelte` files
//! - Conversion of compiler messages into build diagnostics
//! - Import map resolution for bare specifiers

pub mod bridge;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod importmap;
pub mod loader;
pub mod pool;

pub use bridge::NodeCompiler;
pub use compile::{
    CompileRequest, CompileResult, CompilerFailure, CompilerOptions, ComponentCompiler,
    FailureKind, Message, MessageKind, compile,
};
pub use config::CompilerConfig;
pub use diagnostics::{BuildLocation, BuildMessage, convert_messages, find_line_text};
pub use error::{Error, Result};
pub use importmap::{ImportMap, Resolver};
pub use loader::{ComponentLoader, LoadResult, is_component};
pub use pool::{CompilerPool, PooledCompiler};
