//! Bitcoin address encodings for a compressed public key.
//!
//! Three single-key script types are supported: legacy P2PKH, native
//! SegWit v0 P2WPKH, and P2WPKH nested in P2SH.

use seedtree::encoding::{base58check_decode, base58check_encode, bech32_decode, bech32_encode};
use seedtree::hash::hash160;
use seedtree::{Error, Result};
use serde::Serialize;

use crate::extended_key::CompressedPublicKey;
use crate::network::{Network, NetworkParams};

/// Witness version of P2WPKH programs.
const WITNESS_V0: u8 = 0;

/// Legacy pay-to-public-key-hash address.
pub fn p2pkh(public_key: &CompressedPublicKey, params: &NetworkParams) -> String {
    base58check_encode(&[params.pubkey_hash], &hash160(public_key))
}

/// Native SegWit v0 pay-to-witness-public-key-hash address.
pub fn p2wpkh(public_key: &CompressedPublicKey, params: &NetworkParams) -> Result<String> {
    bech32_encode(params.bech32_hrp, WITNESS_V0, &hash160(public_key))
}

/// P2WPKH wrapped in P2SH.
///
/// The redeem script is `OP_0 PUSH20 <hash160(pubkey)>`.
pub fn p2sh_p2wpkh(public_key: &CompressedPublicKey, params: &NetworkParams) -> String {
    let mut redeem_script = [0u8; 22];
    redeem_script[0] = 0x00;
    redeem_script[1] = 0x14;
    redeem_script[2..].copy_from_slice(&hash160(public_key));

    base58check_encode(&[params.script_hash], &hash160(&redeem_script))
}

/// Every address form of one public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressSet {
    /// Legacy address
    pub p2pkh: String,
    /// Nested SegWit address
    #[serde(rename = "p2sh-p2wpkh")]
    pub p2sh_p2wpkh: String,
    /// Native SegWit address
    pub p2wpkh: String,
}

impl AddressSet {
    /// Encode `public_key` for `network`.
    pub fn from_public_key(public_key: &CompressedPublicKey, network: Network) -> Result<Self> {
        let params = network.params();
        Ok(Self {
            p2pkh: p2pkh(public_key, params),
            p2sh_p2wpkh: p2sh_p2wpkh(public_key, params),
            p2wpkh: p2wpkh(public_key, params)?,
        })
    }
}

/// Split a Base58Check address into its version byte and 20-byte hash.
pub fn decode_base58_hash(address: &str) -> Result<(u8, [u8; 20])> {
    let data = base58check_decode(address)?;
    if data.len() != 21 {
        return Err(Error::InvalidEncoding);
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&data[1..]);
    Ok((data[0], hash))
}

/// Split a SegWit address into (hrp, witness version, witness program).
pub fn decode_segwit(address: &str) -> Result<(String, u8, Vec<u8>)> {
    bech32_decode(address)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    // Compressed public key of Alice's first child on every network.
    const CHILD_0: CompressedPublicKey =
        hex!("03745c9aceb84dcdeddf2c3cdc1edb0b0b5af2f9bf85612d73fa6394758eaee35d");
    const CHILD_0_HASH: [u8; 20] = hex!("fb8820f35effa054399540b8ca86040d8ddaa4d5");

    #[test]
    fn test_regtest_addresses() {
        let set = AddressSet::from_public_key(&CHILD_0, Network::Regtest).unwrap();
        assert_eq!(set.p2pkh, "n4SvybJicv79X1Uc4o3fYXWGwXadA53FSq");
        assert_eq!(set.p2sh_p2wpkh, "2MzFvFvnhFskGnVQpUr1ZPr4wYWLwf211s6");
        assert_eq!(set.p2wpkh, "bcrt1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx4ggs05g");
    }

    #[test]
    fn test_mainnet_addresses() {
        let set = AddressSet::from_public_key(&CHILD_0, Network::Mainnet).unwrap();
        assert_eq!(set.p2pkh, "1PvygYDjotftjtzzME5HicHx5XyvDAwGRC");
        assert_eq!(set.p2sh_p2wpkh, "38hiCBrfeREvahnGoiPgmu5gLA8mwVbX9b");
        assert_eq!(set.p2wpkh, "bc1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx4q8j3cj");
    }

    #[test]
    fn test_testnet_shares_base58_with_regtest() {
        let testnet = AddressSet::from_public_key(&CHILD_0, Network::Testnet).unwrap();
        let regtest = AddressSet::from_public_key(&CHILD_0, Network::Regtest).unwrap();
        assert_eq!(testnet.p2pkh, regtest.p2pkh);
        assert_eq!(testnet.p2sh_p2wpkh, regtest.p2sh_p2wpkh);
        assert_eq!(testnet.p2wpkh, "tb1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx42pfzrp");
    }

    #[test]
    fn test_decode_p2pkh() {
        let (version, hash) = decode_base58_hash("n4SvybJicv79X1Uc4o3fYXWGwXadA53FSq").unwrap();
        assert_eq!(version, 0x6f);
        assert_eq!(hash, CHILD_0_HASH);
    }

    #[test]
    fn test_decode_p2sh_matches_redeem_script() {
        let (version, hash) = decode_base58_hash("38hiCBrfeREvahnGoiPgmu5gLA8mwVbX9b").unwrap();
        assert_eq!(version, 0x05);

        let mut script = vec![0x00, 0x14];
        script.extend_from_slice(&CHILD_0_HASH);
        assert_eq!(hash, hash160(&script));
    }

    #[test]
    fn test_decode_segwit() {
        let (hrp, version, program) =
            decode_segwit("bcrt1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx4ggs05g").unwrap();
        assert_eq!(hrp, "bcrt");
        assert_eq!(version, 0);
        assert_eq!(program, CHILD_0_HASH);
    }

    #[test]
    fn test_decode_rejects_tampered_address() {
        assert!(decode_base58_hash("n4SvybJicv79X1Uc4o3fYXWGwXadA53FSr").is_err());
        assert!(decode_segwit("bcrt1qlwyzpu67l7s9gwv4gzuv4psypkxa4fx4ggs05h").is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_payload_length() {
        let short = base58check_encode(&[0x6f], &[0u8; 19]);
        let err = decode_base58_hash(&short).unwrap_err();
        assert_eq!(err, Error::InvalidEncoding);
        assert_eq!(err.to_string(), "invalid encoding");
    }

    #[test]
    fn test_serialized_field_names() {
        let set = AddressSet::from_public_key(&CHILD_0, Network::Regtest).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("p2sh-p2wpkh").is_some());
        assert!(json.get("p2sh_p2wpkh").is_none());
    }
}
