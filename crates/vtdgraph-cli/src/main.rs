//! vtdgraph CLI - compile census precincts into adjacency graph artifacts.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vtdgraph")]
#[command(author, version, about = "Precinct adjacency graph compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a prepared precinct collection into graph artifacts
    Compile(commands::compile::CompileArgs),

    /// Validate an .idx file (checksum, offsets, neighbor symmetry)
    Verify(commands::verify::VerifyArgs),

    /// Print the header and node data of an .idx file
    Inspect(commands::inspect::InspectArgs),

    /// List built-in state metadata
    States(commands::states::StatesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Verify(args) => commands::verify::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::States(args) => commands::states::run(args),
    }
}
