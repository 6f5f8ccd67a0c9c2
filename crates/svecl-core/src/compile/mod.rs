//! Compile adapter for Svelte components.
//!
//! This module provides:
//! - The [`ComponentCompiler`] seam to an external compiler
//! - [`compile`], which normalizes compiler output into a [`CompileResult`]
//! - Message, failure and source-map types shared with the loader
//!
//! # Outcomes
//!
//! ```text
//! compile(source, options)
//!     │
//!     ├── Ok(CompilerOutput) ──────────────► code + "//# sourceMappingURL=...", warnings
//!     │
//!     ├── ParseError / ValidationError ────► code: None, [error]
//!     │
//!     └── anything else ───────────────────► Err (unchanged)
//! ```

mod adapter;
mod failure;
mod source_map;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use adapter::{ComponentCompiler, compile};
pub use failure::{CompilerFailure, FailureKind};
pub use source_map::{SOURCE_MAPPING_URL_PREFIX, SourceMap, append_source_map_comment};
pub use types::{
    CompileRequest, CompileResult, CompilerOptions, CompilerOutput, Location, Message,
    MessageKind, Record,
};
