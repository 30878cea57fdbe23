// Mint domain types - configuration and fetched key material

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mint the wallet is configured to trust
///
/// The url is the unique key; the name is only for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintConfig {
    pub url: String,
    pub name: String,
}

impl MintConfig {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Seed list used when the store holds no mint configuration
pub fn default_mints() -> Vec<MintConfig> {
    vec![
        MintConfig::new("https://mint.minibits.cash/Bitcoin", "Minibits"),
        MintConfig::new("https://mint2.nutmix.cash", "Nutmix"),
        MintConfig::new("https://mint.lnvoltz.com", "Voltz"),
    ]
}

/// Server self-description returned by a mint's info endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintInfo {
    pub name: String,
    pub pubkey: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub motd: Option<String>,
}

impl MintInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A versioned set of a mint's public signing keys, amount -> key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub id: String,
    pub unit: String,
    pub keys: BTreeMap<u64, String>,
}

/// Summary entry from the mint's keyset listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetDescriptor {
    pub id: String,
    pub unit: String,
    pub active: bool,
}

/// Everything fetched from one mint in a single successful sync
///
/// Replaced as a whole unit; a failed sync never produces a partial update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintMetadata {
    pub url: String,
    pub info: MintInfo,
    pub keys: Vec<KeySet>,
    pub keysets: Vec<KeysetDescriptor>,
    pub synced_at: DateTime<Utc>,
}

impl MintMetadata {
    /// The active keyset descriptors for a given unit
    pub fn active_keysets(&self, unit: &str) -> Vec<&KeysetDescriptor> {
        self.keysets
            .iter()
            .filter(|k| k.active && k.unit == unit)
            .collect()
    }

    /// Look up the full key set for a keyset id
    pub fn keys_for(&self, keyset_id: &str) -> Option<&KeySet> {
        self.keys.iter().find(|k| k.id == keyset_id)
    }
}
