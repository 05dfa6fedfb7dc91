//! BIP-39 mnemonic codec.
//!
//! Entropy is extended with the leading `ENT / 32` bits of its SHA-256
//! digest and split into 11-bit groups, each selecting a word from the
//! English wordlist.

use core::fmt;

use bip39::Language;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::hash::sha256;
use crate::seed::Seed;

/// Bits encoded by a single word.
const BITS_PER_WORD: usize = 11;

/// A checksummed BIP-39 mnemonic.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    /// The entropy bytes (16-32 bytes depending on word count)
    entropy: Zeroizing<Vec<u8>>,
    /// Indices into the English wordlist
    indices: Vec<u16>,
}

impl Mnemonic {
    /// Encode entropy as a mnemonic.
    ///
    /// Entropy length must be 16, 20, 24, 28, or 32 bytes.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        if !matches!(entropy.len(), 16 | 20 | 24 | 28 | 32) {
            return Err(Error::InvalidEntropyLength(entropy.len()));
        }

        let checksum_bits = entropy.len() / 4;
        let hash = sha256(entropy);

        let mut bits = Vec::with_capacity(entropy.len() * 8 + checksum_bits);
        for byte in entropy {
            push_bits(&mut bits, *byte, 8);
        }
        for i in 0..checksum_bits {
            bits.push(bit_at(&hash, i));
        }

        let indices = bits
            .chunks(BITS_PER_WORD)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u16, |acc, &bit| (acc << 1) | u16::from(bit))
            })
            .collect();

        bits.zeroize();

        Ok(Self {
            entropy: Zeroizing::new(entropy.to_vec()),
            indices,
        })
    }

    /// Parse and validate a phrase.
    ///
    /// Verifies the word count, that every word is in the wordlist, and the
    /// checksum, then recovers the underlying entropy.
    pub fn parse(phrase: &str) -> Result<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();

        if !matches!(words.len(), 12 | 15 | 18 | 21 | 24) {
            return Err(Error::InvalidWordCount(words.len()));
        }

        let indices = words
            .iter()
            .map(|word| {
                Language::English
                    .find_word(word)
                    .ok_or_else(|| Error::UnknownWord((*word).to_string()))
            })
            .collect::<Result<Vec<u16>>>()?;

        let total_bits = indices.len() * BITS_PER_WORD;
        let checksum_bits = total_bits / 33;
        let entropy_bits = total_bits - checksum_bits;

        let mut bits = Vec::with_capacity(total_bits);
        for index in &indices {
            push_bits(&mut bits, *index, BITS_PER_WORD);
        }

        let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
        for (i, bit) in bits[..entropy_bits].iter().enumerate() {
            if *bit {
                entropy[i / 8] |= 1 << (7 - (i % 8));
            }
        }

        let hash = sha256(&entropy);
        let checksum_ok = bits[entropy_bits..]
            .iter()
            .enumerate()
            .all(|(i, &expected)| bit_at(&hash, i) == expected);
        bits.zeroize();

        if !checksum_ok {
            return Err(Error::ChecksumMismatch);
        }

        Ok(Self { entropy, indices })
    }

    /// Recover the entropy this mnemonic encodes.
    pub fn to_entropy(&self) -> Vec<u8> {
        self.entropy.to_vec()
    }

    /// Borrow the entropy bytes.
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// The words, in order.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        let list = Language::English.word_list();
        self.indices.iter().map(move |&i| list[usize::from(i)])
    }

    /// Space separated phrase.
    pub fn phrase(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.indices.len()
    }

    /// Stretch into a 64-byte seed.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        Seed::from_mnemonic(self, passphrase)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.word_count())
    }
}

impl core::str::FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Append the low `width` bits of `value`, most significant first.
fn push_bits(bits: &mut Vec<bool>, value: impl Into<u16>, width: usize) {
    let value = value.into();
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

/// Bit `i` of `bytes`, counting from the most significant bit of byte 0.
fn bit_at(bytes: &[u8], i: usize) -> bool {
    (bytes[i / 8] >> (7 - (i % 8))) & 1 == 1
}
