//! Resolve command implementation.

use std::path::Path;

use svecl_core::Resolver;

use crate::colors::{DIM, RED, RESET};

/// Resolve each specifier and print the result.
///
/// Returns `false` if any specifier could not be resolved.
pub fn execute(import_map: &Path, specifiers: &[String]) -> anyhow::Result<bool> {
    let resolver = Resolver::from_file(import_map)?;
    let mut all_resolved = true;

    for specifier in specifiers {
        match resolver.resolve_import(specifier) {
            Ok(Some(path)) => println!("{} -> {}", specifier, path.display()),
            Ok(None) => println!("{} -> {DIM}(default resolution){RESET}", specifier),
            Err(e) => {
                all_resolved = false;
                eprintln!("{RED}error{RESET}: {}", e);
            }
        }
    }

    Ok(all_resolved)
}
