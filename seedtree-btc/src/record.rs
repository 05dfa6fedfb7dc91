//! Flattened string views of generated wallets.
//!
//! These are the shapes written to the JSON artifact: per identity, one
//! master object followed by one object per child.

use core::fmt;

use seedtree::{Entropy, Identity, Mnemonic, Result, Seed};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use zeroize::Zeroize;

use crate::address::AddressSet;
use crate::extended_key::ExtendedPrivateKey;
use crate::path::DerivationPath;

/// Master-level values of one wallet.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterView {
    /// Entropy hex
    pub entropy: String,
    /// Space-separated mnemonic phrase
    pub mnemonic: String,
    /// 64-byte seed hex
    pub seed: String,
    /// Master extended private key
    pub xpriv_master: String,
    /// Master secret scalar hex
    pub priv_key_master: String,
    /// Master secret as WIF
    pub wif_master: String,
    /// Master extended public key
    pub xpub_master: String,
    /// Master compressed public key hex
    pub pub_key_master: String,
    /// Master fingerprint hex
    pub pub_key_fingerprint_master: String,
}

impl MasterView {
    /// Flatten the master-level values.
    pub fn new(
        entropy: &Entropy,
        mnemonic: &Mnemonic,
        seed: &Seed,
        master: &ExtendedPrivateKey,
    ) -> Self {
        Self {
            entropy: entropy.to_hex(),
            mnemonic: mnemonic.phrase(),
            seed: seed.to_hex(),
            xpriv_master: master.to_xprv(),
            priv_key_master: master.private_key_hex(),
            wif_master: master.to_wif(),
            xpub_master: master.to_xpub(),
            pub_key_master: hex::encode(master.public_key()),
            pub_key_fingerprint_master: hex::encode(master.fingerprint()),
        }
    }

    /// Labelled values in artifact order.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("entropy", self.entropy.as_str()),
            ("mnemonic", self.mnemonic.as_str()),
            ("seed", self.seed.as_str()),
            ("xprivMaster", self.xpriv_master.as_str()),
            ("privKeyMaster", self.priv_key_master.as_str()),
            ("wifMaster", self.wif_master.as_str()),
            ("xpubMaster", self.xpub_master.as_str()),
            ("pubKeyMaster", self.pub_key_master.as_str()),
            ("pubKeyFingerprintMaster", self.pub_key_fingerprint_master.as_str()),
        ]
    }
}

impl Drop for MasterView {
    fn drop(&mut self) {
        self.entropy.zeroize();
        self.mnemonic.zeroize();
        self.seed.zeroize();
        self.xpriv_master.zeroize();
        self.priv_key_master.zeroize();
        self.wif_master.zeroize();
    }
}

impl fmt::Debug for MasterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterView")
            .field("xpub_master", &self.xpub_master)
            .field("pub_key_fingerprint_master", &self.pub_key_fingerprint_master)
            .finish_non_exhaustive()
    }
}

/// Values of one derived child key.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildView {
    /// Child extended private key
    pub xpriv: String,
    /// Child secret scalar hex
    pub priv_key: String,
    /// Child secret as WIF
    pub wif: String,
    /// Child extended public key
    pub xpub: String,
    /// Compressed public key hex
    pub pub_key: String,
    /// Hash160 of the public key, hex
    pub pub_key_hash: String,
    /// Fingerprint hex
    pub pub_key_fingerprint: String,
    /// Addresses of the public key
    #[serde(flatten)]
    pub addresses: AddressSet,
    /// Derivation path from the master key
    pub path: String,
}

impl ChildView {
    /// Flatten a derived key found at `path`.
    pub fn new(key: &ExtendedPrivateKey, path: &DerivationPath) -> Result<Self> {
        let public_key = key.public_key();
        let identifier = key.identifier();

        Ok(Self {
            xpriv: key.to_xprv(),
            priv_key: key.private_key_hex(),
            wif: key.to_wif(),
            xpub: key.to_xpub(),
            pub_key: hex::encode(public_key),
            pub_key_hash: hex::encode(identifier),
            pub_key_fingerprint: hex::encode(&identifier[..4]),
            addresses: AddressSet::from_public_key(&public_key, key.network())?,
            path: path.to_string(),
        })
    }

    /// Labelled values in artifact order.
    pub fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("xpriv", self.xpriv.as_str()),
            ("privKey", self.priv_key.as_str()),
            ("wif", self.wif.as_str()),
            ("xpub", self.xpub.as_str()),
            ("pubKey", self.pub_key.as_str()),
            ("pubKeyHash", self.pub_key_hash.as_str()),
            ("pubKeyFingerprint", self.pub_key_fingerprint.as_str()),
            ("p2pkh", self.addresses.p2pkh.as_str()),
            ("p2sh-p2wpkh", self.addresses.p2sh_p2wpkh.as_str()),
            ("p2wpkh", self.addresses.p2wpkh.as_str()),
            ("path", self.path.as_str()),
        ]
    }
}

impl Drop for ChildView {
    fn drop(&mut self) {
        self.xpriv.zeroize();
        self.priv_key.zeroize();
        self.wif.zeroize();
    }
}

impl fmt::Debug for ChildView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildView")
            .field("path", &self.path)
            .field("pub_key", &self.pub_key)
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

/// One identity's complete wallet: the master view and every child.
///
/// Serializes as a JSON array, master first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    identity: Identity,
    master: MasterView,
    children: Vec<ChildView>,
}

impl WalletRecord {
    /// Bundle a finished wallet.
    pub fn new(identity: Identity, master: MasterView, children: Vec<ChildView>) -> Self {
        Self {
            identity,
            master,
            children,
        }
    }

    /// Owner of the wallet.
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    /// Master-level values.
    pub const fn master(&self) -> &MasterView {
        &self.master
    }

    /// Child views in derivation order.
    pub fn children(&self) -> &[ChildView] {
        &self.children
    }

    /// Master WIF followed by each child WIF.
    pub fn wifs(&self) -> impl Iterator<Item = &str> + '_ {
        core::iter::once(self.master.wif_master.as_str())
            .chain(self.children.iter().map(|child| child.wif.as_str()))
    }
}

impl Serialize for WalletRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.children.len()))?;
        seq.serialize_element(&self.master)?;
        for child in &self.children {
            seq.serialize_element(child)?;
        }
        seq.end()
    }
}

/// Every generated wallet, in identity order.
///
/// Serializes as a JSON object keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallets {
    records: Vec<WalletRecord>,
}

impl Wallets {
    /// Empty collection.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, replacing any earlier record of the same identity.
    pub fn insert(&mut self, record: WalletRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.identity == record.identity)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Record of one identity.
    pub fn get(&self, identity: Identity) -> Option<&WalletRecord> {
        self.records
            .iter()
            .find(|record| record.identity == identity)
    }

    /// Records in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, WalletRecord> {
        self.records.iter()
    }

    /// Number of wallets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no wallet was generated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every WIF, wallet by wallet, master before children.
    pub fn wifs(&self) -> Vec<&str> {
        self.records.iter().flat_map(|record| record.wifs()).collect()
    }

    /// [`wifs`](Self::wifs) paired with the owning identity.
    pub fn labelled_wifs(&self) -> Vec<(Identity, &str)> {
        self.records
            .iter()
            .flat_map(|record| record.wifs().map(move |wif| (record.identity, wif)))
            .collect()
    }

    /// Pretty-printed JSON artifact.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Wallets {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(record.identity.key(), record)?;
        }
        map.end()
    }
}

impl FromIterator<WalletRecord> for Wallets {
    fn from_iter<I: IntoIterator<Item = WalletRecord>>(iter: I) -> Self {
        let mut wallets = Self::new();
        for record in iter {
            wallets.insert(record);
        }
        wallets
    }
}

impl<'a> IntoIterator for &'a Wallets {
    type Item = &'a WalletRecord;
    type IntoIter = core::slice::Iter<'a, WalletRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn record(identity: Identity) -> WalletRecord {
        let entropy = Entropy::fixture(identity).unwrap();
        let mnemonic = Mnemonic::from_entropy(entropy.as_bytes()).unwrap();
        let seed = mnemonic.to_seed("");
        let master = ExtendedPrivateKey::from_seed(seed.as_bytes(), Network::Regtest).unwrap();

        let children = (0..3)
            .map(|i| {
                let path = DerivationPath::wallet_child(i).unwrap();
                ChildView::new(&master.derive_path(&path).unwrap(), &path).unwrap()
            })
            .collect();

        WalletRecord::new(
            identity,
            MasterView::new(&entropy, &mnemonic, &seed, &master),
            children,
        )
    }

    #[test]
    fn test_master_field_names() {
        let json = serde_json::to_value(record(Identity::Alice).master()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for (label, _) in record(Identity::Alice).master().fields() {
            assert!(keys.contains(&label), "missing {label}");
        }
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn test_child_field_order() {
        let record = record(Identity::Alice);
        let json = serde_json::to_string(&record.children()[0]).unwrap();

        let mut last = 0;
        for (label, value) in record.children()[0].fields() {
            let needle = format!("\"{label}\":\"{value}\"");
            let pos = json.find(&needle).unwrap();
            assert!(pos >= last, "{label} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_record_serializes_as_array() {
        let json = serde_json::to_value(record(Identity::Bob)).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert!(items[0].get("xprivMaster").is_some());
        assert_eq!(items[3]["path"], "m/0'/0'/2'");
    }

    #[test]
    fn test_wallets_keep_insertion_order() {
        let wallets: Wallets = [Identity::Carol, Identity::Alice]
            .into_iter()
            .map(record)
            .collect();
        let json = wallets.to_json_pretty().unwrap();
        assert!(json.find("\"carol\"").unwrap() < json.find("\"alice\"").unwrap());
        assert!(json.starts_with("{\n  \"carol\": [\n    {"));
    }

    #[test]
    fn test_wifs_per_wallet() {
        let wallets: Wallets = [Identity::Alice, Identity::Bob].into_iter().map(record).collect();
        let wifs = wallets.wifs();
        assert_eq!(wifs.len(), 8);
        assert_eq!(wifs[0], "cPefpopKGSrh6jh7scQt8jfq9CEWCNGhruNZ61R5BGqaqVAtgVp6");
        assert_eq!(wifs[1], "cQBwuzEBYQrbWKFZZFpgitRpdDDxUrT1nzvhDWhxMmFtWdRnrCSm");

        let labelled = wallets.labelled_wifs();
        assert_eq!(labelled[3].0, Identity::Alice);
        assert_eq!(labelled[4].0, Identity::Bob);
    }

    #[test]
    fn test_insert_replaces_same_identity() {
        let mut wallets = Wallets::new();
        wallets.insert(record(Identity::Eve));
        wallets.insert(record(Identity::Eve));
        assert_eq!(wallets.len(), 1);
        assert!(wallets.get(Identity::Eve).is_some());
        assert!(wallets.get(Identity::Dave).is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let record = record(Identity::Alice);
        let debug = format!("{record:?}");
        assert!(!debug.contains(&record.master().mnemonic));
        assert!(!debug.contains(&record.children()[0].wif));
    }
}
