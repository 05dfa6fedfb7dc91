//! Bitcoin key trees and addresses for deterministic test wallets.
//!
//! Turns [`seedtree`] entropy into BIP-32 key trees and the records written
//! for each named identity.
//!
//! # Usage
//!
//! ```
//! use seedtree::Identity;
//! use seedtree_btc::{GeneratorConfig, generate};
//!
//! let wallets = generate(&GeneratorConfig::default())?;
//! let alice = wallets.get(Identity::Alice).unwrap();
//! assert_eq!(alice.children().len(), 3);
//! assert!(alice.children()[0].addresses.p2wpkh.starts_with("bcrt1q"));
//! # Ok::<(), seedtree::Error>(())
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation
)]
#![forbid(unsafe_code)]

pub mod address;
pub mod assembler;
pub mod extended_key;
pub mod network;
pub mod path;
pub mod record;

pub use address::AddressSet;
pub use assembler::{
    DEFAULT_CHILDREN, GeneratorConfig, NoopObserver, Observer, Scope, Step, assemble_wallet,
    generate, generate_each, generate_with,
};
pub use extended_key::{ExtendedPrivateKey, ExtendedPublicKey};
pub use network::{Network, NetworkParams};
pub use path::{ChildIndex, DerivationPath};
pub use record::{ChildView, MasterView, WalletRecord, Wallets};
pub use seedtree::{Error, Result};
