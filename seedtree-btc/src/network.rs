//! Bitcoin network parameters.

use core::fmt;
use core::str::FromStr;

use seedtree::Error;

/// Version bytes and prefixes that differ between networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// P2PKH address version byte.
    pub pubkey_hash: u8,
    /// P2SH address version byte.
    pub script_hash: u8,
    /// Bech32 human-readable part for SegWit addresses.
    pub bech32_hrp: &'static str,
    /// WIF private key prefix.
    pub wif: u8,
    /// Extended private key version bytes.
    pub xprv: [u8; 4],
    /// Extended public key version bytes.
    pub xpub: [u8; 4],
}

const MAINNET: NetworkParams = NetworkParams {
    pubkey_hash: 0x00,
    script_hash: 0x05,
    bech32_hrp: "bc",
    wif: 0x80,
    xprv: [0x04, 0x88, 0xAD, 0xE4],
    xpub: [0x04, 0x88, 0xB2, 0x1E],
};

const TESTNET: NetworkParams = NetworkParams {
    pubkey_hash: 0x6f,
    script_hash: 0xc4,
    bech32_hrp: "tb",
    wif: 0xef,
    xprv: [0x04, 0x35, 0x83, 0x94],
    xpub: [0x04, 0x35, 0x87, 0xCF],
};

const REGTEST: NetworkParams = NetworkParams {
    bech32_hrp: "bcrt",
    ..TESTNET
};

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Bitcoin mainnet.
    Mainnet,
    /// Bitcoin testnet.
    Testnet,
    /// Local regression-test network.
    #[default]
    Regtest,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Self; 3] = [Self::Mainnet, Self::Testnet, Self::Regtest];

    /// Prefixes and version bytes for this network.
    #[inline]
    #[must_use]
    pub const fn params(self) -> &'static NetworkParams {
        match self {
            Self::Mainnet => &MAINNET,
            Self::Testnet => &TESTNET,
            Self::Regtest => &REGTEST,
        }
    }

    /// Get network name as string.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }

    /// Chain selection flag understood by `bitcoin-cli`, if any.
    #[inline]
    #[must_use]
    pub const fn cli_flag(self) -> Option<&'static str> {
        match self {
            Self::Mainnet => None,
            Self::Testnet => Some("-testnet"),
            Self::Regtest => Some("-regtest"),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(Error::UnsupportedNetwork(s.to_string())),
        }
    }
}
