//! BIP-32 Hierarchical Deterministic (HD) key derivation.

use core::fmt;

use hmac::{Hmac, Mac};
use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey};
use seedtree::encoding::{base58check_decode, base58check_encode};
use seedtree::hash::hash160;
use seedtree::{Error, Result};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::network::Network;
use crate::path::{ChildIndex, DerivationPath};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Length of a serialized extended key before the checksum.
const SERIALIZED_LEN: usize = 78;

/// Compressed SEC1 public key.
pub type CompressedPublicKey = [u8; 33];

/// BIP-32 Extended Private Key.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    /// secp256k1 secret scalar, never zero and always below the curve order
    secret: SecretKey,
    /// Chain code for key derivation
    chain_code: [u8; 32],
    /// Depth in the derivation tree (0 for master)
    depth: u8,
    /// First 4 bytes of hash160 of the parent public key
    parent_fingerprint: [u8; 4],
    /// Child index that produced this key
    child_index: ChildIndex,
    network: Network,
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.chain_code.zeroize();
        self.depth = 0;
        self.parent_fingerprint.zeroize();
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ExtendedPrivateKey {
    /// Create the master key from a seed.
    ///
    /// The seed is keyed into HMAC-SHA512 with `"Bitcoin seed"`; the left
    /// half becomes the secret scalar and the right half the chain code.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let mut mac =
            HmacSha512::new_from_slice(MASTER_HMAC_KEY).map_err(|_| Error::InvalidMasterKey)?;
        mac.update(seed);
        let mut result = mac.finalize().into_bytes();

        let secret = master_secret(&result[..32]);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..]);
        result.as_mut_slice().zeroize();

        Ok(Self {
            secret: secret?,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: ChildIndex::Normal(0),
            network,
        })
    }

    /// Derive a child key at the given index.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let depth = self.depth.checked_add(1).ok_or(Error::MaxDepthExceeded)?;

        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|_| Error::InvalidChildKey(index.to_u32()))?;

        match index {
            // HMAC-SHA512(Key = chainCode, Data = serP(point(kpar)) || ser32(i))
            ChildIndex::Normal(_) => mac.update(&self.public_key()),
            // HMAC-SHA512(Key = chainCode, Data = 0x00 || ser256(kpar) || ser32(i))
            ChildIndex::Hardened(_) => {
                let mut parent = self.secret.to_bytes();
                mac.update(&[0u8]);
                mac.update(&parent);
                parent.as_mut_slice().zeroize();
            }
        }
        mac.update(&index.to_u32().to_be_bytes());

        let mut result = mac.finalize().into_bytes();
        let (il, ir) = result.split_at(32);

        let secret = add_tweak(il, &self.secret);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);
        result.as_mut_slice().zeroize();

        Ok(Self {
            secret: secret.ok_or(Error::InvalidChildKey(index.to_u32()))?,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index: index,
            network: self.network,
        })
    }

    /// Derive along a path, one level at a time.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.indices()
            .iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    /// Raw 32-byte secret scalar.
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes().into()
    }

    /// Secret scalar as lowercase hex.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret.to_bytes())
    }

    /// Compressed public key.
    pub fn public_key(&self) -> CompressedPublicKey {
        compress(&self.secret.public_key())
    }

    /// Hash160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key())
    }

    /// First 4 bytes of [`identifier`](Self::identifier).
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.public_key())
    }

    /// Get the chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Get the depth.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Get the parent fingerprint.
    pub const fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// Get the child index.
    pub const fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Get the network.
    pub const fn network(&self) -> Network {
        self.network
    }

    /// The same key re-tagged for another network.
    ///
    /// Key material and chain code are untouched; only serialization prefixes change.
    pub fn with_network(&self, network: Network) -> Self {
        let mut key = self.clone();
        key.network = network;
        key
    }

    /// Drop the private half.
    pub fn neuter(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            public_key: self.secret.public_key(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            network: self.network,
        }
    }

    /// Serialize to xprv/tprv (Base58Check).
    pub fn to_xprv(&self) -> String {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(&self.secret.to_bytes());

        let encoded = serialize(
            self.network.params().xprv,
            self.depth,
            self.parent_fingerprint,
            self.child_index,
            &self.chain_code,
            &key_data,
        );
        key_data.zeroize();
        encoded
    }

    /// Serialize the public half to xpub/tpub (Base58Check).
    pub fn to_xpub(&self) -> String {
        self.neuter().to_xpub()
    }

    /// Export the secret as compressed WIF.
    pub fn to_wif(&self) -> String {
        let mut payload = [0u8; 33];
        payload[..32].copy_from_slice(&self.secret.to_bytes());
        payload[32] = 0x01;

        let encoded = base58check_encode(&[self.network.params().wif], &payload);
        payload.zeroize();
        encoded
    }

    /// Parse an xprv/tprv, checking its version bytes against `network`.
    pub fn from_xprv(encoded: &str, network: Network) -> Result<Self> {
        let raw = Deserialized::parse(encoded, network.params().xprv)?;

        if raw.key_data[0] != 0x00 {
            return Err(Error::InvalidEncoding);
        }
        let secret = SecretKey::from_slice(&raw.key_data[1..]).map_err(|_| Error::InvalidEncoding)?;

        Ok(Self {
            secret,
            chain_code: raw.chain_code,
            depth: raw.depth,
            parent_fingerprint: raw.parent_fingerprint,
            child_index: raw.child_index,
            network,
        })
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("network", &self.network)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// BIP-32 Extended Public Key.
///
/// Supports non-hardened child derivation only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: PublicKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
    network: Network,
}

impl ExtendedPublicKey {
    /// Derive a non-hardened child: `point(parse256(IL)) + Kpar`.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if index.is_hardened() {
            return Err(Error::InvalidDerivationPath(format!(
                "hardened index {index} needs a private key"
            )));
        }
        let depth = self.depth.checked_add(1).ok_or(Error::MaxDepthExceeded)?;

        let parent = self.public_key();
        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|_| Error::InvalidChildKey(index.to_u32()))?;
        mac.update(&parent);
        mac.update(&index.to_u32().to_be_bytes());
        let result = mac.finalize().into_bytes();
        let (il, ir) = result.split_at(32);

        let tweak = parse_scalar(il).ok_or(Error::InvalidChildKey(index.to_u32()))?;
        let point = ProjectivePoint::GENERATOR * tweak + self.public_key.to_projective();
        let public_key = PublicKey::from_affine(AffinePoint::from(point))
            .map_err(|_| Error::InvalidChildKey(index.to_u32()))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(Self {
            public_key,
            chain_code,
            depth,
            parent_fingerprint: fingerprint_of(&parent),
            child_index: index,
            network: self.network,
        })
    }

    /// Compressed public key.
    pub fn public_key(&self) -> CompressedPublicKey {
        compress(&self.public_key)
    }

    /// Hash160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key())
    }

    /// First 4 bytes of [`identifier`](Self::identifier).
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.public_key())
    }

    /// Get the chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Get the depth.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Get the parent fingerprint.
    pub const fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// Get the child index.
    pub const fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Serialize to xpub/tpub (Base58Check).
    pub fn to_xpub(&self) -> String {
        serialize(
            self.network.params().xpub,
            self.depth,
            self.parent_fingerprint,
            self.child_index,
            &self.chain_code,
            &self.public_key(),
        )
    }

    /// Parse an xpub/tpub, checking its version bytes against `network`.
    pub fn from_xpub(encoded: &str, network: Network) -> Result<Self> {
        let raw = Deserialized::parse(encoded, network.params().xpub)?;
        let public_key =
            PublicKey::from_sec1_bytes(&raw.key_data).map_err(|_| Error::InvalidPublicKey)?;

        Ok(Self {
            public_key,
            chain_code: raw.chain_code,
            depth: raw.depth,
            parent_fingerprint: raw.parent_fingerprint,
            child_index: raw.child_index,
            network,
        })
    }
}

/// Fields of a decoded 78-byte extended key.
struct Deserialized {
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
    chain_code: [u8; 32],
    key_data: [u8; 33],
}

impl Deserialized {
    fn parse(encoded: &str, version: [u8; 4]) -> Result<Self> {
        let data = base58check_decode(encoded)?;
        if data.len() != SERIALIZED_LEN || data[..4] != version {
            return Err(Error::InvalidEncoding);
        }

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut child_number = [0u8; 4];
        child_number.copy_from_slice(&data[9..13]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let mut key_data = [0u8; 33];
        key_data.copy_from_slice(&data[45..78]);

        Ok(Self {
            depth: data[4],
            parent_fingerprint,
            child_index: ChildIndex::from(u32::from_be_bytes(child_number)),
            chain_code,
            key_data,
        })
    }
}

impl Drop for Deserialized {
    fn drop(&mut self) {
        self.chain_code.zeroize();
        self.key_data.zeroize();
    }
}

/// version || depth || parent fingerprint || child number || chain code || key data
fn serialize(
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
    chain_code: &[u8; 32],
    key_data: &[u8; 33],
) -> String {
    let mut payload = Vec::with_capacity(SERIALIZED_LEN - 4);
    payload.push(depth);
    payload.extend_from_slice(&parent_fingerprint);
    payload.extend_from_slice(&child_index.to_u32().to_be_bytes());
    payload.extend_from_slice(chain_code);
    payload.extend_from_slice(key_data);

    let encoded = base58check_encode(&version, &payload);
    payload.zeroize();
    encoded
}

/// Master secret from the left half of the seed HMAC; zero or >= n is rejected.
fn master_secret(il: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(il).map_err(|_| Error::InvalidMasterKey)
}

/// `parse256(IL) + kpar (mod n)`, `None` if IL >= n or the sum is zero.
fn add_tweak(il: &[u8], parent: &SecretKey) -> Option<SecretKey> {
    let tweak = parse_scalar(il)?;
    let child: Option<NonZeroScalar> =
        NonZeroScalar::new(tweak + *parent.to_nonzero_scalar()).into();
    child.map(SecretKey::from)
}

/// Interpret 32 big-endian bytes as a scalar, `None` if not below the curve order.
fn parse_scalar(bytes: &[u8]) -> Option<Scalar> {
    Scalar::from_repr(*FieldBytes::from_slice(bytes)).into()
}

fn compress(public_key: &PublicKey) -> CompressedPublicKey {
    let point = public_key.to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(point.as_bytes());
    bytes
}

fn fingerprint_of(public_key: &CompressedPublicKey) -> [u8; 4] {
    let hash = hash160(public_key);
    [hash[0], hash[1], hash[2], hash[3]]
}
