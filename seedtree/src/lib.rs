//! # seedtree - deterministic test wallet primitives
//!
//! Chain-agnostic building blocks for reproducible hierarchical wallets:
//!
//! - [`entropy`]: per-identity entropy, fixed fixtures or OS randomness
//! - [`mnemonic`]: BIP-39 encode/decode with checksum verification
//! - [`seed`]: PBKDF2 stretching of a mnemonic into a 64-byte seed
//! - [`hash`] and [`encoding`]: Hash160, Base58Check and Bech32
//!
//! ```
//! use seedtree::{Entropy, Identity, Mnemonic};
//!
//! let entropy = Entropy::fixture(Identity::Alice)?;
//! let mnemonic = Mnemonic::from_entropy(entropy.as_bytes())?;
//! assert_eq!(mnemonic.word_count(), 12);
//!
//! let seed = mnemonic.to_seed("");
//! assert_eq!(seed.as_bytes().len(), 64);
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
    clippy::missing_const_for_fn
)]
#![forbid(unsafe_code)]

pub mod encoding;
pub mod entropy;
pub mod error;
pub mod hash;
pub mod mnemonic;
pub mod seed;

pub use entropy::{Entropy, EntropySource, Identity};
pub use error::{Error, Result};
pub use mnemonic::Mnemonic;
pub use seed::Seed;
