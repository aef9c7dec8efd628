//! nbexport CLI - export notebook cells as Swift packages.

mod colors;
mod deps;
mod export;
mod inspect;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nbexport")]
#[command(about = "Export notebook cells as Swift packages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a notebook as a package and sync sibling packages
    Export {
        /// Path to the notebook (.ipynb file)
        notebook: String,

        /// Naming prefix shared by sibling packages
        #[arg(short, long, default_value = nbexport_core::config::DEFAULT_PACKAGE_PREFIX)]
        prefix: String,

        /// Package directory (default: <output-dir>/<prefix><notebook name>)
        #[arg(long)]
        package: Option<String>,

        /// Directory the default package is created in
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Directory substituted for `$cwd` in %install specs
        #[arg(long)]
        working_dir: Option<String>,

        /// swift-tools-version of the generated manifest
        #[arg(long, default_value = nbexport_core::config::DEFAULT_TOOLS_VERSION)]
        tools_version: String,

        /// Hard link files into other packages instead of copying
        #[arg(long)]
        hardlink: bool,

        /// Render only the first declaration of each dependency name
        #[arg(long)]
        dedupe: bool,

        /// Do not update sibling packages
        #[arg(long)]
        no_propagate: bool,

        /// Re-export whenever the notebook changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Show how a notebook's cells are classified
    Inspect {
        /// Path to the notebook (.ipynb file)
        notebook: String,

        /// Directory substituted for `$cwd` in %install specs
        #[arg(long)]
        working_dir: Option<String>,
    },

    /// List the dependencies declared in a Package.swift
    Deps {
        /// Path to the manifest
        #[arg(default_value = "Package.swift")]
        manifest: String,
    },
}

fn main() -> anyhow::Result<()> {
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
        .with_target(false)
        .init();

    match cli.command {
        Commands::Export {
            notebook,
            prefix,
            package,
            output_dir,
            working_dir,
            tools_version,
            hardlink,
            dedupe,
            no_propagate,
            watch,
        } => {
            let options = export::ExportOptions {
                prefix,
                package,
                output_dir,
                working_dir,
                tools_version,
                hardlink,
                dedupe,
                propagate: !no_propagate,
            };
            export::execute(&notebook, &options, watch)?;
        }

        Commands::Inspect {
            notebook,
            working_dir,
        } => {
            inspect::execute(&notebook, working_dir.as_deref())?;
        }

        Commands::Deps { manifest } => {
            deps::execute(&manifest)?;
        }
    }

    Ok(())
}
