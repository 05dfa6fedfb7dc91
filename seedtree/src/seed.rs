//! BIP-39 seed derivation.

use core::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::mnemonic::Mnemonic;

/// Number of PBKDF2 rounds for seed derivation.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Seed length in bytes.
pub const SEED_LEN: usize = 64;

/// A 64-byte seed stretched from a mnemonic and passphrase.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// PBKDF2-HMAC-SHA512 over the phrase, salted with `"mnemonic" + passphrase`.
    pub fn from_mnemonic(mnemonic: &Mnemonic, passphrase: &str) -> Self {
        let phrase = Zeroizing::new(mnemonic.phrase());
        let salt = Zeroizing::new(format!("mnemonic{passphrase}"));

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        pbkdf2_hmac::<Sha512>(
            phrase.as_bytes(),
            salt.as_bytes(),
            PBKDF2_ROUNDS,
            seed.as_mut_slice(),
        );

        Self(seed)
    }

    /// Wrap raw seed bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_slice())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}
