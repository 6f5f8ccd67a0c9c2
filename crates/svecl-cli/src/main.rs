//! svecl CLI - compile Svelte components and resolve import maps.

mod check;
mod colors;
mod compile;
mod resolve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use svecl_core::{CompilerConfig, CompilerOptions, NodeCompiler};

#[derive(Parser)]
#[command(name = "svecl")]
#[command(about = "Compile Svelte components and resolve import maps")]
#[command(version)]
#[command(after_help = "Examples:
  # Compile a component next to its source
  svecl compile src/App.svelte --outfile dist/App.js

  # Check every component, compiling them in parallel
  svecl check src/*.svelte

  # Resolve bare imports using the mappings specified in importmap.json
  svecl resolve --import-map js/importmap.json svelte svelte/store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single component
    Compile {
        /// Path to the component (.svelte file)
        file: PathBuf,

        /// Write the output (generated code, or JSON with --json) here instead of stdout
        #[arg(short, long)]
        outfile: Option<PathBuf>,

        /// Emit the whole result (code and messages) as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Compile components and report their diagnostics
    Check {
        /// Paths to the components (.svelte files)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of compiler workers (default: number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Resolve bare specifiers with an import map
    Resolve {
        /// Import map (https://github.com/wicg/import-maps)
        #[arg(long)]
        import_map: PathBuf,

        /// Specifiers to resolve
        #[arg(required = true)]
        specifiers: Vec<String>,
    },

    /// Print the svecl and Svelte compiler versions
    Version {
        #[command(flatten)]
        compiler: CompilerArgs,
    },
}

/// Options shared by commands that run the compiler.
#[derive(Args)]
struct CompilerArgs {
    /// Path to the Svelte distribution (compiler.js) to use instead of
    /// the svelte package node resolves
    #[arg(long)]
    svelte: Option<PathBuf>,

    /// Path to the node binary
    #[arg(long)]
    node: Option<PathBuf>,

    /// Compiler option as KEY=VALUE (VALUE is JSON or a plain string)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,
}

impl CompilerArgs {
    fn config(&self) -> CompilerConfig {
        CompilerConfig {
            node_path: self.node.clone(),
            svelte_path: self.svelte.clone(),
            ..CompilerConfig::default()
        }
    }

    fn compiler_options(&self) -> anyhow::Result<CompilerOptions> {
        let mut options = CompilerOptions::new();
        for assignment in &self.options {
            let Some((key, value)) = CompilerOptions::parse_assignment(assignment) else {
                anyhow::bail!("Invalid compiler option '{}', expected KEY=VALUE", assignment);
            };
            options.set(key, value);
        }
        Ok(options)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format svecl-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<svecl_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let ok = match cli.command {
        Commands::Compile {
            file,
            outfile,
            json,
            compiler,
        } => {
            let options = compiler.compiler_options()?;
            compile::execute(&file, outfile.as_deref(), json, &compiler.config(), options)
                .map_err(format_error)?
        }

        Commands::Check {
            files,
            jobs,
            compiler,
        } => {
            let options = compiler.compiler_options()?;
            let mut config = compiler.config();
            if let Some(jobs) = jobs {
                config = config.with_pool_size(jobs);
            }
            check::execute(&files, &config, options).map_err(format_error)?
        }

        Commands::Resolve {
            import_map,
            specifiers,
        } => resolve::execute(&import_map, &specifiers).map_err(format_error)?,

        Commands::Version { compiler } => {
            print_version(&compiler.config()).map_err(format_error)?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Print svecl's version and the version of the Svelte compiler it loads.
fn print_version(config: &CompilerConfig) -> anyhow::Result<()> {
    let mut compiler = NodeCompiler::spawn(config)?;
    let svelte_version = compiler.version()?;
    println!("{} (Svelte {})", env!("CARGO_PKG_VERSION"), svelte_version);
    Ok(())
}
