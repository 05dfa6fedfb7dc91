//! BIP-32 derivation paths.
//!
//! Test wallets use the legacy Bitcoin Core layout `m/0'/0'/i'`: three
//! hardened levels, the last one selecting the key.

use core::fmt;
use core::str::FromStr;

use seedtree::{Error, Result};

/// A child index in a derivation path.
///
/// Hardened indices are >= 2^31 in raw form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index: 0 to 2^31 - 1
    Normal(u32),
    /// Hardened index: displayed as n', stored as n
    Hardened(u32),
}

impl ChildIndex {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal (non-hardened) child index.
    pub fn normal(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            Err(Error::InvalidDerivationPath(format!("index {index} out of range")))
        } else {
            Ok(Self::Normal(index))
        }
    }

    /// Create a hardened child index.
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            Err(Error::InvalidDerivationPath(format!("index {index}' out of range")))
        } else {
            Ok(Self::Hardened(index))
        }
    }

    /// Check if this is a hardened index.
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Get the raw index value (without hardened flag).
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// Convert to the raw u32 value used in derivation and serialization.
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidDerivationPath(s.to_string());

        match s.strip_suffix(['\'', 'h', 'H']) {
            Some(index) => Self::hardened(index.parse().map_err(|_| invalid())?),
            None => Self::normal(s.parse().map_err(|_| invalid())?),
        }
    }
}

/// A BIP-32 derivation path rooted at the master key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// The empty path (master key).
    pub fn master() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Create a derivation path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Test wallet child path `m/0'/0'/i'`.
    pub fn wallet_child(index: u32) -> Result<Self> {
        Ok(Self {
            indices: vec![
                ChildIndex::hardened(0)?,
                ChildIndex::hardened(0)?,
                ChildIndex::hardened(index)?,
            ],
        })
    }

    /// Parse paths like `m/0'/0'/1'` or `m/0h/0h/1h`.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();

        let rest = match path {
            "m" | "M" => return Ok(Self::master()),
            _ => path
                .strip_prefix("m/")
                .or_else(|| path.strip_prefix("M/"))
                .ok_or_else(|| Error::InvalidDerivationPath(path.to_string()))?,
        };

        let indices = rest
            .split('/')
            .map(str::parse::<ChildIndex>)
            .collect::<Result<Vec<ChildIndex>>>()?;

        Ok(Self { indices })
    }

    /// Get the child indices in this path.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Number of levels below the master key.
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    /// Check if this path is empty (master key).
    pub fn is_master(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check if every level is hardened.
    pub fn is_fully_hardened(&self) -> bool {
        self.indices.iter().all(ChildIndex::is_hardened)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_child_display() {
        for i in 0..3 {
            let path = DerivationPath::wallet_child(i).unwrap();
            assert_eq!(path.to_string(), format!("m/0'/0'/{i}'"));
            assert_eq!(path.depth(), 3);
            assert!(path.is_fully_hardened());
        }
    }

    #[test]
    fn test_parse_variants() {
        let expected = DerivationPath::wallet_child(2).unwrap();
        assert_eq!(DerivationPath::parse("m/0'/0'/2'").unwrap(), expected);
        assert_eq!(DerivationPath::parse("m/0h/0h/2h").unwrap(), expected);
        assert_eq!("M/0H/0'/2h".parse::<DerivationPath>().unwrap(), expected);
    }

    #[test]
    fn test_parse_master() {
        assert!(DerivationPath::parse("m").unwrap().is_master());
    }

    #[test]
    fn test_parse_mixed() {
        let path = DerivationPath::parse("m/44'/0'/0'/0/5").unwrap();
        assert_eq!(path.indices()[3], ChildIndex::Normal(0));
        assert_eq!(path.indices()[4], ChildIndex::Normal(5));
        assert!(!path.is_fully_hardened());
        assert_eq!(path.to_string(), "m/44'/0'/0'/0/5");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DerivationPath::parse("0'/0'").is_err());
        assert!(DerivationPath::parse("m/").is_err());
        assert!(DerivationPath::parse("m/x'").is_err());
        assert!(DerivationPath::parse("m/2147483648").is_err());
    }

    #[test]
    fn test_child_index_raw() {
        assert_eq!(ChildIndex::Hardened(2).to_u32(), 0x8000_0002);
        assert_eq!(ChildIndex::from(0x8000_0002), ChildIndex::Hardened(2));
        assert_eq!(ChildIndex::from(7), ChildIndex::Normal(7));
        assert!(ChildIndex::hardened(ChildIndex::HARDENED_OFFSET).is_err());
    }
}
