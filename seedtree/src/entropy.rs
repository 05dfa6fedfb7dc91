//! Entropy source for the fixed set of test identities.
//!
//! Every identity either gets a fixed literal (reproducible fixtures) or
//! fresh bytes from the operating system CSPRNG.

use core::fmt;

use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Smallest accepted entropy size in bytes.
pub const MIN_ENTROPY_BYTES: usize = 16;
/// Largest accepted entropy size in bytes.
pub const MAX_ENTROPY_BYTES: usize = 32;

/// The named wallet owners, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identity {
    /// Alice.
    Alice,
    /// Bob.
    Bob,
    /// Carol.
    Carol,
    /// Dave.
    Dave,
    /// Eve.
    Eve,
    /// Mallory.
    Mallory,
}

impl Identity {
    /// All identities in the order wallets are generated and emitted.
    pub const ALL: [Self; 6] = [
        Self::Alice,
        Self::Bob,
        Self::Carol,
        Self::Dave,
        Self::Eve,
        Self::Mallory,
    ];

    /// Lowercase key used in the output artifact and as import label.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Alice => "alice",
            Self::Bob => "bob",
            Self::Carol => "carol",
            Self::Dave => "dave",
            Self::Eve => "eve",
            Self::Mallory => "mallory",
        }
    }

    /// Capitalized name for human-facing output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Alice => "Alice",
            Self::Bob => "Bob",
            Self::Carol => "Carol",
            Self::Dave => "Dave",
            Self::Eve => "Eve",
            Self::Mallory => "Mallory",
        }
    }

    /// Fixed 16-byte fixture entropy, hex encoded.
    #[must_use]
    pub const fn fixture_hex(self) -> &'static str {
        match self {
            Self::Alice => "182301471f6892728ae56bb95b54396e",
            Self::Bob => "28c8b37e1462a460fafa440d3ec66d29",
            Self::Carol => "61628dbe355f4675d895d399b984aaf4",
            Self::Dave => "6dc790b775c765abbbd981c0cdbbce9e",
            Self::Eve => "d8ec0331d6228a59b17cb412700761f0",
            Self::Mallory => "6af8462dd020ff7e2239a0a346d27448",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw entropy bytes tagged with the identity they belong to.
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy {
    identity: Identity,
    bytes: Zeroizing<Vec<u8>>,
}

impl Entropy {
    /// Obtain entropy for `identity`.
    ///
    /// With `num_bytes` set, that many bytes are drawn from the OS CSPRNG;
    /// otherwise the identity's fixed fixture is returned.
    pub fn generate(identity: Identity, num_bytes: Option<usize>) -> Result<Self> {
        match num_bytes {
            Some(len) => Self::random_with(&mut OsRng, identity, len),
            None => Self::fixture(identity),
        }
    }

    /// The identity's fixed fixture entropy.
    pub fn fixture(identity: Identity) -> Result<Self> {
        Self::from_hex(identity, identity.fixture_hex())
    }

    /// Draw `len` bytes from the supplied CSPRNG.
    pub fn random_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        identity: Identity,
        len: usize,
    ) -> Result<Self> {
        validate_len(len)?;

        let mut bytes = Zeroizing::new(vec![0u8; len]);
        rng.fill_bytes(&mut bytes);

        Ok(Self { identity, bytes })
    }

    /// Parse caller-supplied hex entropy.
    pub fn from_hex(identity: Identity, hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(hex::decode(hex_str.trim())?);
        validate_len(bytes.len())?;
        Ok(Self { identity, bytes })
    }

    /// Identity this entropy belongs to.
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for validated entropy; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes.as_slice())
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("identity", &self.identity)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Where wallet entropy comes from for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntropySource {
    /// Fixed per-identity literals.
    #[default]
    Fixture,
    /// Fresh OS randomness of the given size for every identity.
    Random {
        /// Bytes per identity.
        bytes: usize,
    },
}

impl EntropySource {
    /// Random entropy source; the size is checked before any bytes are drawn.
    pub fn random(bytes: usize) -> Result<Self> {
        validate_len(bytes)?;
        Ok(Self::Random { bytes })
    }

    /// Entropy for one identity.
    pub fn entropy_for(&self, identity: Identity) -> Result<Entropy> {
        match *self {
            Self::Fixture => Entropy::generate(identity, None),
            Self::Random { bytes } => Entropy::generate(identity, Some(bytes)),
        }
    }
}

fn validate_len(len: usize) -> Result<()> {
    if (MIN_ENTROPY_BYTES..=MAX_ENTROPY_BYTES).contains(&len) && len % 4 == 0 {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            expected: MIN_ENTROPY_BYTES,
            actual: len,
        })
    }
}
