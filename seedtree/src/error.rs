//! Error types for wallet derivation.

use core::fmt;

/// A convenient Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while deriving test wallets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Requested entropy size is not a multiple of 4 in `16..=32`.
    InvalidLength {
        /// Expected length (the lower bound for entropy requests).
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// Entropy handed to the mnemonic codec has an unsupported length.
    InvalidEntropyLength(usize),
    /// Mnemonic phrase does not have 12, 15, 18, 21 or 24 words.
    InvalidWordCount(usize),
    /// Mnemonic word is not in the English wordlist.
    UnknownWord(String),
    /// Mnemonic checksum bits do not match the entropy.
    ChecksumMismatch,
    /// Seed handed to BIP-32 is outside `16..=64` bytes.
    InvalidSeedLength(usize),
    /// Master scalar derived from the seed is zero or not below the curve order.
    InvalidMasterKey,
    /// Child scalar at the given raw index is zero or not below the curve order.
    InvalidChildKey(u32),
    /// Derivation would exceed depth 255.
    MaxDepthExceeded,
    /// Derivation path string could not be parsed.
    InvalidDerivationPath(String),
    /// Network name is not one of mainnet, testnet or regtest.
    UnsupportedNetwork(String),
    /// Malformed base58, bech32 or hex input.
    InvalidEncoding,
    /// Base58Check checksum does not match its payload.
    InvalidChecksum,
    /// Bytes are not a valid compressed secp256k1 point.
    InvalidPublicKey,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => write!(
                f,
                "invalid entropy length {actual}, must be a multiple of 4 between {expected} and 32 bytes"
            ),
            Self::InvalidEntropyLength(n) => {
                write!(f, "invalid entropy length {n}, must be 16, 20, 24, 28 or 32 bytes")
            }
            Self::InvalidWordCount(n) => {
                write!(f, "invalid word count {n}, must be 12, 15, 18, 21, or 24")
            }
            Self::UnknownWord(word) => write!(f, "\"{word}\" is not a BIP-39 word"),
            Self::ChecksumMismatch => write!(f, "mnemonic checksum mismatch"),
            Self::InvalidSeedLength(n) => {
                write!(f, "invalid seed length {n}, must be between 16 and 64 bytes")
            }
            Self::InvalidMasterKey => write!(f, "seed produced an invalid master key"),
            Self::InvalidChildKey(index) => write!(f, "invalid child key at index {index:#010x}"),
            Self::MaxDepthExceeded => write!(f, "maximum derivation depth exceeded"),
            Self::InvalidDerivationPath(p) => write!(f, "invalid derivation path: {p}"),
            Self::UnsupportedNetwork(name) => write!(
                f,
                "unsupported network \"{name}\", expected mainnet, testnet or regtest"
            ),
            Self::InvalidEncoding => write!(f, "invalid encoding"),
            Self::InvalidChecksum => write!(f, "invalid base58check checksum"),
            Self::InvalidPublicKey => write!(f, "invalid public key"),
        }
    }
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Self {
        Self::InvalidEncoding
    }
}

impl From<bs58::decode::Error> for Error {
    fn from(_: bs58::decode::Error) -> Self {
        Self::InvalidEncoding
    }
}
