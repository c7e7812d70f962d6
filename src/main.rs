//! Command-line front end: temperature sweeps to CSV and quench snapshots.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod run;

use cli::{Cli, Command};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    setup_logging();

    let cli = Cli::parse();
    match &cli.command {
        Command::Sweep(args) => {
            run::sweep(args, cli.no_progress)?;
        }
        Command::Viz(args) => {
            run::viz(args, cli.no_progress)?;
        }
    }
    Ok(())
}
