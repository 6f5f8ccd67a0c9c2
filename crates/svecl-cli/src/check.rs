//! Check command implementation.

use std::path::PathBuf;

use svecl_core::{CompilerConfig, CompilerOptions, ComponentLoader, NodeCompiler, is_component};

use crate::colors::{BOLD, DIM, GREEN, RED, RESET, YELLOW};

/// Compile all `files` and print their diagnostics.
///
/// Returns `false` if any component has errors or could not be compiled.
pub fn execute(
    files: &[PathBuf],
    config: &CompilerConfig,
    options: CompilerOptions,
) -> anyhow::Result<bool> {
    if let Some(file) = files.iter().find(|f| !is_component(f)) {
        anyhow::bail!("{} is not a Svelte component (.svelte)", file.display());
    }

    // No more workers than there are files to compile
    let config = config.clone().with_pool_size(config.pool_size.min(files.len()));
    let loader = ComponentLoader::new(NodeCompiler::pool(&config)?).with_options(options);

    let mut error_count = 0;
    let mut warning_count = 0;

    for (path, outcome) in loader.load_all(files) {
        match outcome {
            Ok(result) => {
                for message in result.errors.iter().chain(&result.warnings) {
                    eprint!("{}", message.format_terminal());
                }
                error_count += result.errors.len();
                warning_count += result.warnings.len();
                if !result.has_errors() {
                    tracing::debug!("{} compiled cleanly", path.display());
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!("{RED}{BOLD}error{RESET}: {}: {}", path.display(), e.with_hint());
            }
        }
    }

    let summary_color = if error_count > 0 {
        RED
    } else if warning_count > 0 {
        YELLOW
    } else {
        GREEN
    };
    eprintln!(
        "{summary_color}{BOLD}Checked {} component(s){RESET} {DIM}({} error(s), {} warning(s)){RESET}",
        files.len(),
        error_count,
        warning_count
    );

    Ok(error_count == 0)
}
