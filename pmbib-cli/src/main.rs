use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

mod collaborators;
mod commands;
mod config;
mod logging;

use config::AppConfig;

#[derive(Parser)]
#[command(
    name = "pmbib",
    version,
    about = "Convert PubMed XML into bibliographic interchange formats",
    long_about = "Extract records from PubMed XML and export them as PubMed (MEDLINE), \
                  bibliometrix, BibTeX, RIS or Web of Science files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file (defaults are used when it does not exist)
    #[arg(long, env = "PMBIB_CONFIG", default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PubMed XML files into one output format
    Convert(commands::convert::Convert),
    /// Count and list records matching a query
    Search(commands::search::Search),
    /// Fetch matching records and write every export format
    Fetch(commands::fetch::Fetch),
    /// Convert a WoS source table into a Web of Science flat file
    Wos(commands::wos::Wos),
    /// Remove generated files
    Clean(commands::clean::Clean),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?;
    logging::init_logging(&config, cli.verbose)?;
    let created = config.setup_directories()?;
    debug!(config = %cli.config.display(), created = created.len(), "Configuration loaded");

    match &cli.command {
        Commands::Convert(cmd) => cmd.execute(&config),
        Commands::Search(cmd) => cmd.execute(&config),
        Commands::Fetch(cmd) => cmd.execute(&config),
        Commands::Wos(cmd) => cmd.execute(&config),
        Commands::Clean(cmd) => cmd.execute(&config),
    }
}
