//! Importing generated keys into a local node.

use std::process::Command;

use anyhow::{Context, bail};
use seedtree::Identity;
use seedtree_btc::{Network, Wallets};
use tracing::{debug, warn};

/// Something that can take ownership of a private key.
pub trait KeyImporter {
    /// Import one WIF under the identity's label.
    fn import(&mut self, identity: Identity, wif: &str) -> anyhow::Result<()>;
}

/// Imports through the node's RPC client binary.
#[derive(Debug, Clone)]
pub struct BitcoinCliImporter {
    program: String,
    network: Network,
    rpc_args: Vec<String>,
}

impl BitcoinCliImporter {
    /// Importer running `program` against `network`.
    pub fn new(program: impl Into<String>, network: Network, rpc_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            network,
            rpc_args,
        }
    }

    /// Arguments for one `importprivkey` call; rescanning is left off.
    pub fn args(&self, identity: Identity, wif: &str) -> Vec<String> {
        self.network
            .cli_flag()
            .map(str::to_owned)
            .into_iter()
            .chain(self.rpc_args.iter().cloned())
            .chain([
                "importprivkey".to_owned(),
                wif.to_owned(),
                identity.key().to_owned(),
                "false".to_owned(),
            ])
            .collect()
    }
}

impl KeyImporter for BitcoinCliImporter {
    fn import(&mut self, identity: Identity, wif: &str) -> anyhow::Result<()> {
        debug!(program = %self.program, identity = identity.key(), "importing key");

        let output = Command::new(&self.program)
            .args(self.args(identity, wif))
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Outcome of importing every key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Keys accepted by the importer
    pub imported: usize,
    /// Keys the importer rejected
    pub failed: usize,
}

/// Feed every WIF to `importer`; failures are logged and counted, not raised.
pub fn import_all<I: KeyImporter + ?Sized>(importer: &mut I, wallets: &Wallets) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (identity, wif) in wallets.labelled_wifs() {
        match importer.import(identity, wif) {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!(identity = identity.key(), error = %format!("{e:#}"), "key import failed");
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use seedtree_btc::{GeneratorConfig, generate};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Identity, String)>,
        reject: Option<Identity>,
    }

    impl KeyImporter for Recorder {
        fn import(&mut self, identity: Identity, wif: &str) -> anyhow::Result<()> {
            self.calls.push((identity, wif.to_owned()));
            if self.reject == Some(identity) {
                bail!("rejected");
            }
            Ok(())
        }
    }

    #[test]
    fn test_regtest_args() {
        let importer = BitcoinCliImporter::new(
            "bitcoin-cli",
            Network::Regtest,
            vec!["-rpcwallet=test".to_owned()],
        );
        assert_eq!(
            importer.args(Identity::Bob, "cWIF"),
            ["-regtest", "-rpcwallet=test", "importprivkey", "cWIF", "bob", "false"]
        );
    }

    #[test]
    fn test_mainnet_has_no_chain_flag() {
        let importer = BitcoinCliImporter::new("bitcoin-cli", Network::Mainnet, Vec::new());
        assert_eq!(
            importer.args(Identity::Alice, "KWIF"),
            ["importprivkey", "KWIF", "alice", "false"]
        );
    }

    #[test]
    fn test_import_all_visits_every_wif_in_order() {
        let wallets = generate(&GeneratorConfig::default()).unwrap();
        let mut recorder = Recorder::default();

        let summary = import_all(&mut recorder, &wallets);

        assert_eq!(summary, ImportSummary { imported: 24, failed: 0 });
        assert_eq!(recorder.calls[0].0, Identity::Alice);
        assert_eq!(
            recorder.calls[0].1,
            "cPefpopKGSrh6jh7scQt8jfq9CEWCNGhruNZ61R5BGqaqVAtgVp6"
        );
        assert_eq!(recorder.calls[23].0, Identity::Mallory);
    }

    #[test]
    fn test_failures_do_not_stop_import() {
        let wallets = generate(&GeneratorConfig::default()).unwrap();
        let mut recorder = Recorder {
            reject: Some(Identity::Carol),
            ..Recorder::default()
        };

        let summary = import_all(&mut recorder, &wallets);

        assert_eq!(summary, ImportSummary { imported: 20, failed: 4 });
        assert_eq!(recorder.calls.len(), 24);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let mut importer =
            BitcoinCliImporter::new("seedtree-no-such-program", Network::Regtest, Vec::new());
        let err = importer.import(Identity::Eve, "cWIF").unwrap_err();
        assert!(err.to_string().contains("failed to run seedtree-no-such-program"));
    }
}
