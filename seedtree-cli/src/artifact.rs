//! Writing the wallet artifact.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use seedtree_btc::Wallets;
use tracing::info;

/// Destination for generated wallets.
pub trait ArtifactWriter {
    /// Persist `wallets`, returning where they went.
    fn write(&self, wallets: &Wallets) -> anyhow::Result<PathBuf>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    path: PathBuf,
}

impl JsonFileWriter {
    /// Writer targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactWriter for JsonFileWriter {
    fn write(&self, wallets: &Wallets) -> anyhow::Result<PathBuf> {
        let mut json = wallets
            .to_json_pretty()
            .context("failed to serialize wallets")?;
        json.push('\n');

        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        info!(path = %self.path.display(), wallets = wallets.len(), "wrote artifact");
        Ok(self.path.clone())
    }
}
