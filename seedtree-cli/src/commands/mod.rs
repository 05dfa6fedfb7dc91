//! CLI command definitions and handlers.

mod generate;

use clap::Parser;
pub use generate::GenerateCommand;

/// Seedtree - deterministic Bitcoin test wallets for alice, bob, carol,
/// dave, eve and mallory.
#[derive(Parser)]
#[command(name = "seedtree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub generate: GenerateCommand,
}
