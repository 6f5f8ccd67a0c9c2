//! Compile command implementation.

use std::fs;
use std::path::Path;

use svecl_core::{
    BuildMessage, CompilerConfig, CompilerOptions, CompilerPool, ComponentLoader, NodeCompiler,
    is_component,
};

use crate::colors::{BOLD, GREEN, RESET};

/// Compile one component. Returns `false` if it has errors.
pub fn execute(
    file: &Path,
    outfile: Option<&Path>,
    json: bool,
    config: &CompilerConfig,
    options: CompilerOptions,
) -> anyhow::Result<bool> {
    if !is_component(file) {
        anyhow::bail!("{} is not a Svelte component (.svelte)", file.display());
    }

    let compiler = NodeCompiler::spawn(config)?;
    let loader = ComponentLoader::new(CompilerPool::new(vec![compiler])).with_options(options);
    let result = loader.compile_file(file)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result)?;
        match outfile {
            Some(path) => write_output(path, &rendered)?,
            None => println!("{rendered}"),
        }
        return Ok(result.is_success());
    }

    for message in result.errors().chain(result.warnings()) {
        eprint!("{}", BuildMessage::from_message(message).format_terminal());
    }

    let Some(code) = result.code else {
        return Ok(false);
    };

    match outfile {
        Some(path) => {
            write_output(path, &code)?;
            eprintln!(
                "{GREEN}{BOLD}Compiled{RESET} {} -> {}",
                file.display(),
                path.display()
            );
        }
        None => println!("{code}"),
    }

    Ok(true)
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
