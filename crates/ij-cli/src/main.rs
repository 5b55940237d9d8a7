use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ij_cli::tracing_init::init_tracing;
use ij_cli::{cmd_check, cmd_explain, load_config};

#[derive(Parser)]
#[command(name = "ij-plan", about = "Plan streaming joins and explain the physical operators")]
struct Cli {
    /// Path to planner.toml (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the physical plan of a query file
    Explain {
        /// Path to the query .toml file
        file: PathBuf,
    },

    /// Report how the join would be planned, exiting 1 if planning fails
    Check {
        /// Path to the query .toml file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, base_dir) = load_config(cli.config.as_deref())?;
    let _guard = init_tracing(&config.logging, &base_dir)?;

    match cli.command {
        Commands::Explain { file } => {
            cmd_explain::run(&file, &config)?;
        }

        Commands::Check { file } => {
            if !cmd_check::run(&file, &config)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
