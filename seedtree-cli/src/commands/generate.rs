//! Wallet generation command.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use colored::Colorize;
use seedtree::EntropySource;
use seedtree_btc::{GeneratorConfig, Network, NoopObserver, Wallets, generate_with};
use tracing::info;

use crate::artifact::{ArtifactWriter, JsonFileWriter};
use crate::import::{BitcoinCliImporter, ImportSummary, import_all};
use crate::report::Reporter;

/// Generate every identity's wallet, write it out and import the keys.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Random entropy of this many bytes per identity (16-32, multiple of 4).
    /// Without it, fixed fixture entropy is used.
    #[arg(short, long, value_name = "BYTES")]
    entropy: Option<usize>,

    /// Network whose prefixes are used.
    #[arg(short, long, value_enum, default_value = "regtest")]
    network: CliNetwork,

    /// Print every intermediate value.
    #[arg(short, long)]
    verbose: bool,

    /// Where the JSON artifact is written.
    #[arg(short, long, value_name = "PATH", default_value = "wallets.json")]
    output: PathBuf,

    /// Skip importing keys into the node.
    #[arg(long)]
    no_import: bool,

    /// Node RPC client program.
    #[arg(long, value_name = "PROGRAM", default_value = "bitcoin-cli")]
    bitcoin_cli: String,

    /// Extra argument passed to the RPC client before the method (repeatable).
    #[arg(long = "rpc-arg", value_name = "ARG", allow_hyphen_values = true)]
    rpc_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNetwork {
    /// Bitcoin mainnet (xprv, 1..., bc1...)
    Mainnet,
    /// Bitcoin testnet (tprv, m/n..., tb1...)
    Testnet,
    /// Local regtest (tprv, m/n..., bcrt1...)
    Regtest,
}

impl From<CliNetwork> for Network {
    fn from(val: CliNetwork) -> Self {
        match val {
            CliNetwork::Mainnet => Self::Mainnet,
            CliNetwork::Testnet => Self::Testnet,
            CliNetwork::Regtest => Self::Regtest,
        }
    }
}

impl GenerateCommand {
    /// Core configuration described by the options.
    pub fn config(&self) -> anyhow::Result<GeneratorConfig> {
        let entropy = match self.entropy {
            Some(bytes) => EntropySource::random(bytes)
                .with_context(|| format!("invalid --entropy {bytes}"))?,
            None => EntropySource::Fixture,
        };
        Ok(GeneratorConfig::new(self.network.into(), entropy))
    }

    /// Execute the command.
    pub fn execute(self) -> anyhow::Result<()> {
        let config = self.config()?;
        info!(network = %config.network, entropy = ?config.entropy, "generating wallets");

        let wallets = if self.verbose {
            let mut reporter = Reporter::new(io::stdout().lock());
            let wallets = generate_with(&config, &mut reporter)?;
            reporter.finish().context("failed to print report")?;
            wallets
        } else {
            generate_with(&config, &mut NoopObserver)?
        };

        let writer = JsonFileWriter::new(&self.output);
        let path = writer.write(&wallets)?;
        print_summary(&wallets, config.network, &path);

        if self.no_import {
            return Ok(());
        }

        let mut importer = BitcoinCliImporter::new(self.bitcoin_cli, config.network, self.rpc_args);
        let summary = import_all(&mut importer, &wallets);
        print_import(summary);
        Ok(())
    }
}

#[rustfmt::skip]
fn print_summary(wallets: &Wallets, network: Network, path: &std::path::Path) {
    println!();
    println!("      {}      {}", "Network".cyan().bold(), network);
    println!("      {}      {}", "Wallets".cyan().bold(), wallets.len());
    println!("      {}         {}", "Keys".cyan().bold(), wallets.wifs().len());
    println!("      {}       {}", "Output".cyan().bold(), path.display().to_string().green());
    println!();
}

#[rustfmt::skip]
fn print_import(summary: ImportSummary) {
    println!("      {}     {}", "Imported".cyan().bold(), summary.imported);
    if summary.failed > 0 {
        println!("      {}       {}", "Failed".cyan().bold(), summary.failed.to_string().red());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::commands::Cli;

    fn parse(args: &[&str]) -> GenerateCommand {
        Cli::try_parse_from(std::iter::once("seedtree").chain(args.iter().copied()))
            .unwrap()
            .generate
    }

    #[test]
    fn test_defaults() {
        let cmd = parse(&[]);
        assert_eq!(cmd.output, PathBuf::from("wallets.json"));
        assert_eq!(cmd.bitcoin_cli, "bitcoin-cli");
        assert!(!cmd.verbose && !cmd.no_import);
        assert!(cmd.rpc_args.is_empty());

        let config = cmd.config().unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_random_entropy_and_network() {
        let config = parse(&["-e", "32", "-n", "testnet"]).config().unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.entropy, EntropySource::Random { bytes: 32 });
    }

    #[test]
    fn test_invalid_entropy_size() {
        let err = parse(&["--entropy", "17"]).config().unwrap_err();
        assert!(err.to_string().contains("invalid --entropy 17"));
    }

    #[test]
    fn test_repeated_rpc_args() {
        let cmd = parse(&["--rpc-arg", "-rpcwallet=test", "--rpc-arg", "-rpcport=18443"]);
        assert_eq!(cmd.rpc_args, ["-rpcwallet=test", "-rpcport=18443"]);
    }

    #[test]
    fn test_unknown_network_rejected() {
        assert!(Cli::try_parse_from(["seedtree", "--network", "signet"]).is_err());
    }

    #[test]
    fn test_execute_without_import() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        let cmd = parse(&["--no-import", "-o", output.to_str().unwrap()]);

        cmd.execute().unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("bcrt1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx4ggs05g"));
    }
}
