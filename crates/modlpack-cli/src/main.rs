//! modlpack CLI - Module bundle packager
//!
//! Commands:
//! - `modlpack package` - Assemble a `.modl` bundle from modl.toml
//! - `modlpack check` - Validate a modl.toml without writing anything
//! - `modlpack manifest` - Render module.xml for inspection
//! - `modlpack list` - Show the contents of an existing bundle

use clap::{Parser, Subcommand};

mod bundle;
mod logging;
mod project;

#[derive(Parser)]
#[command(name = "modlpack")]
#[command(author, version, about = "Packager for .modl module bundles", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the module bundle
    Package {
        /// Path to modl.toml (default: ./modl.toml)
        #[arg(short, long)]
        config: Option<String>,

        /// Output directory (overrides project.output_dir)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a modl.toml
    Check {
        /// Path to modl.toml (default: ./modl.toml)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Render module.xml without packaging
    Manifest {
        /// Path to modl.toml (default: ./modl.toml)
        #[arg(short, long)]
        config: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the contents of a bundle
    List {
        /// Path to the .modl bundle
        bundle: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Package { config, output } => {
            bundle::run(config, output)?;
        }
        Commands::Check { config } => {
            project::check(config)?;
        }
        Commands::Manifest { config, output } => {
            bundle::render_manifest(config, output)?;
        }
        Commands::List { bundle: path } => {
            bundle::list(&path)?;
        }
    }

    Ok(())
}
