//! Wallet assembly: entropy to mnemonic to seed to key tree to records.
//!
//! This is the public entry point of the core. Configuration is passed in
//! explicitly through [`GeneratorConfig`]; intermediate values are reported
//! through an [`Observer`] instead of being printed.

use seedtree::{Entropy, EntropySource, Identity, Mnemonic, Result};
use tracing::debug;

use crate::extended_key::ExtendedPrivateKey;
use crate::network::Network;
use crate::path::DerivationPath;
use crate::record::{ChildView, MasterView, WalletRecord, Wallets};

/// Children derived per wallet unless configured otherwise.
pub const DEFAULT_CHILDREN: u32 = 3;

/// Inputs of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Network whose prefixes every encoding uses
    pub network: Network,
    /// Where each identity's entropy comes from
    pub entropy: EntropySource,
    /// Children derived at `m/0'/0'/i'`
    pub children: u32,
}

impl GeneratorConfig {
    /// Config with the default child count.
    pub const fn new(network: Network, entropy: EntropySource) -> Self {
        Self {
            network,
            entropy,
            children: DEFAULT_CHILDREN,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(Network::default(), EntropySource::default())
    }
}

/// Which part of a wallet a reported value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Entropy, mnemonic and seed
    Wallet,
    /// Master key encodings
    Master,
    /// Child key at `m/0'/0'/i'`
    Child(u32),
}

/// One intermediate value produced during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    /// Wallet owner
    pub identity: Identity,
    /// Part of the wallet
    pub scope: Scope,
    /// Artifact field name, e.g. `xprivMaster`
    pub label: &'static str,
    /// Encoded value
    pub value: &'a str,
}

/// Receives every intermediate value in generation order.
pub trait Observer {
    /// Called once per produced value.
    fn observe(&mut self, step: &Step<'_>);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&mut self, _step: &Step<'_>) {}
}

impl<F: FnMut(&Step<'_>)> Observer for F {
    fn observe(&mut self, step: &Step<'_>) {
        self(step);
    }
}

/// Build one identity's wallet with the default child count.
pub fn assemble_wallet<O: Observer + ?Sized>(
    identity: Identity,
    entropy: &Entropy,
    network: Network,
    observer: &mut O,
) -> Result<WalletRecord> {
    assemble(identity, entropy, network, DEFAULT_CHILDREN, observer)
}

fn assemble<O: Observer + ?Sized>(
    identity: Identity,
    entropy: &Entropy,
    network: Network,
    children: u32,
    observer: &mut O,
) -> Result<WalletRecord> {
    debug!(identity = identity.key(), %network, bytes = entropy.len(), "assembling wallet");

    let mnemonic = Mnemonic::from_entropy(entropy.as_bytes())?;
    let seed = mnemonic.to_seed("");
    let master = ExtendedPrivateKey::from_seed(seed.as_bytes(), network)?;

    let master_view = MasterView::new(entropy, &mnemonic, &seed, &master);
    for (position, (label, value)) in master_view.fields().into_iter().enumerate() {
        let scope = if position < 3 { Scope::Wallet } else { Scope::Master };
        observer.observe(&Step {
            identity,
            scope,
            label,
            value,
        });
    }

    let mut child_views = Vec::with_capacity(children as usize);
    for index in 0..children {
        let path = DerivationPath::wallet_child(index)?;
        let child = master.derive_path(&path)?;
        let view = ChildView::new(&child, &path)?;

        debug!(identity = identity.key(), %path, "derived child");
        for (label, value) in view.fields() {
            observer.observe(&Step {
                identity,
                scope: Scope::Child(index),
                label,
                value,
            });
        }
        child_views.push(view);
    }

    Ok(WalletRecord::new(identity, master_view, child_views))
}

/// Generate every identity's wallet, stopping at the first error.
pub fn generate(config: &GeneratorConfig) -> Result<Wallets> {
    generate_with(config, &mut NoopObserver)
}

/// [`generate`] reporting intermediate values to `observer`.
pub fn generate_with<O: Observer + ?Sized>(
    config: &GeneratorConfig,
    observer: &mut O,
) -> Result<Wallets> {
    Identity::ALL
        .into_iter()
        .map(|identity| build(config, identity, observer))
        .collect()
}

/// Generate every identity's wallet independently.
///
/// A failed identity contributes its error and no record; the others are
/// unaffected.
pub fn generate_each<O: Observer + ?Sized>(
    config: &GeneratorConfig,
    observer: &mut O,
) -> Vec<(Identity, Result<WalletRecord>)> {
    Identity::ALL
        .into_iter()
        .map(|identity| (identity, build(config, identity, observer)))
        .collect()
}

fn build<O: Observer + ?Sized>(
    config: &GeneratorConfig,
    identity: Identity,
    observer: &mut O,
) -> Result<WalletRecord> {
    let entropy = config.entropy.entropy_for(identity)?;
    assemble(identity, &entropy, config.network, config.children, observer)
}
