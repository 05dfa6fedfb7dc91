//! Base58Check and Bech32 encodings for keys and addresses.

use crate::error::{Error, Result};
use crate::hash::double_sha256;

/// Length of the Base58Check checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Encode `version || payload` to Base58Check.
pub fn base58check_encode(version: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(version.len() + payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(version);
    data.extend_from_slice(payload);

    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(data).into_string()
}

/// Decode a Base58Check string and return the checked payload.
///
/// The returned bytes still include any version prefix; callers split it
/// according to the format they expect.
pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(encoded).into_vec()?;

    if data.len() <= CHECKSUM_LEN {
        return Err(Error::InvalidEncoding);
    }

    let payload_len = data.len() - CHECKSUM_LEN;
    let computed = double_sha256(&data[..payload_len]);
    if data[payload_len..] != computed[..CHECKSUM_LEN] {
        return Err(Error::InvalidChecksum);
    }

    data.truncate(payload_len);
    Ok(data)
}

/// Encode a witness program as a SegWit address.
///
/// Bech32 is used for version 0 and Bech32m for later versions.
pub fn bech32_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    use bech32::Hrp;

    let hrp = Hrp::parse(hrp).map_err(|_| Error::InvalidEncoding)?;
    let witness_version = bech32::Fe32::try_from(version).map_err(|_| Error::InvalidEncoding)?;

    bech32::segwit::encode(hrp, witness_version, program).map_err(|_| Error::InvalidEncoding)
}

/// Decode a SegWit address.
///
/// Returns (hrp, witness_version, witness_program).
pub fn bech32_decode(encoded: &str) -> Result<(String, u8, Vec<u8>)> {
    let (hrp, version, program) =
        bech32::segwit::decode(encoded).map_err(|_| Error::InvalidEncoding)?;

    Ok((hrp.to_string(), version.to_u8(), program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58check_encode_p2pkh_mainnet() {
        let payload = hex_literal::hex!("62e907b15cbf27d5425399ebf6f0fb50ebb88f18");
        assert_eq!(
            base58check_encode(&[0x00], &payload),
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"
        );
    }

    #[test]
    fn test_base58check_encode_p2pkh_testnet() {
        let payload = hex_literal::hex!("62e907b15cbf27d5425399ebf6f0fb50ebb88f18");
        assert_eq!(
            base58check_encode(&[0x6f], &payload),
            "mpXwg4jMtRhuSpVq4xS3HFHmCmWp9NyGKt"
        );
    }

    #[test]
    fn test_base58check_encode_wif_compressed() {
        let payload = hex_literal::hex!(
            "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d01"
        );
        assert_eq!(
            base58check_encode(&[0x80], &payload),
            "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
        );
    }

    #[test]
    fn test_base58check_decode_keeps_version() {
        let data = base58check_decode("mpXwg4jMtRhuSpVq4xS3HFHmCmWp9NyGKt").unwrap();
        assert_eq!(data[0], 0x6f);
        assert_eq!(
            data[1..],
            hex_literal::hex!("62e907b15cbf27d5425399ebf6f0fb50ebb88f18")
        );
    }

    #[test]
    fn test_base58check_decode_invalid_checksum() {
        assert_eq!(
            base58check_decode("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb"),
            Err(Error::InvalidChecksum)
        );
    }

    #[test]
    fn test_base58check_decode_rejects_non_base58() {
        assert_eq!(base58check_decode("0OIl"), Err(Error::InvalidEncoding));
        assert_eq!(base58check_decode("1234"), Err(Error::InvalidEncoding));
    }

    #[test]
    fn test_bech32_encode_p2wpkh_mainnet() {
        let program = hex_literal::hex!("751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(
            bech32_encode("bc", 0, &program).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn test_bech32_decode() {
        let (hrp, version, program) =
            bech32_decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
        assert_eq!(hrp, "bc");
        assert_eq!(version, 0);
        assert_eq!(
            program,
            hex_literal::hex!("751e76e8199196d454941c45d1b3a323f1433bd6")
        );
    }

    #[test]
    fn test_bech32_encode_rejects_bad_hrp() {
        let program = [0u8; 20];
        assert!(bech32_encode("", 0, &program).is_err());
    }
}
