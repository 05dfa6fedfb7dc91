//! Seedtree - deterministic Bitcoin test wallets.
//!
//! Generates the alice..mallory wallets, writes them as JSON and imports
//! their keys into a local node.

mod artifact;
mod commands;
mod import;
mod report;
mod telemetry;

use clap::Parser;
use colored::Colorize;
use commands::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    telemetry::init()?;
    cli.generate.execute()
}
