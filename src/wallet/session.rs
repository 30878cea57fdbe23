// WalletSession - A transient handle binding one mint to a unit and keys
//
// Rebuilt whenever the active mint changes; never persisted. The session
// carries no state of its own beyond the bound metadata and configuration,
// and is consumed by the external transaction protocol.

use crate::mint::{KeySet, KeysetDescriptor, MintInfo, MintMetadata};

/// Default currency unit for new sessions
pub const DEFAULT_UNIT: &str = "sat";

/// Optional overrides applied when binding a session
#[derive(Clone, Debug, Default)]
pub struct WalletOptions {
    unit: Option<String>,
    keys: Option<Vec<KeySet>>,
    keysets: Option<Vec<KeysetDescriptor>>,
    mint_info: Option<MintInfo>,
    seed: Option<Vec<u8>>,
    denomination_target: Option<u32>,
}

impl WalletOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the currency unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Supply explicit key sets instead of the mint's cached ones
    pub fn with_keys(mut self, keys: Vec<KeySet>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Supply explicit keyset descriptors
    pub fn with_keysets(mut self, keysets: Vec<KeysetDescriptor>) -> Self {
        self.keysets = Some(keysets);
        self
    }

    /// Override the mint info
    pub fn with_mint_info(mut self, info: MintInfo) -> Self {
        self.mint_info = Some(info);
        self
    }

    /// Supply deterministic seed material
    pub fn with_seed(mut self, seed: Vec<u8>) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the preferred denomination count for outputs
    pub fn with_denomination_target(mut self, target: u32) -> Self {
        self.denomination_target = Some(target);
        self
    }
}

/// A wallet handle bound to one mint's metadata
#[derive(Clone, Debug)]
pub struct WalletSession {
    mint_url: String,
    unit: String,
    keys: Vec<KeySet>,
    keysets: Vec<KeysetDescriptor>,
    mint_info: MintInfo,
    seed: Option<Vec<u8>>,
    denomination_target: Option<u32>,
}

impl WalletSession {
    /// Bind a session to a mint's metadata, applying any overrides
    pub fn bind(metadata: &MintMetadata, options: WalletOptions) -> Self {
        Self {
            mint_url: metadata.url.clone(),
            unit: options.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            keys: options.keys.unwrap_or_else(|| metadata.keys.clone()),
            keysets: options.keysets.unwrap_or_else(|| metadata.keysets.clone()),
            mint_info: options.mint_info.unwrap_or_else(|| metadata.info.clone()),
            seed: options.seed,
            denomination_target: options.denomination_target,
        }
    }

    /// Url of the bound mint
    pub fn mint_url(&self) -> &str {
        &self.mint_url
    }

    /// Currency unit the session operates in
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Key sets available to the session
    pub fn keys(&self) -> &[KeySet] {
        &self.keys
    }

    /// Keyset descriptors available to the session
    pub fn keysets(&self) -> &[KeysetDescriptor] {
        &self.keysets
    }

    /// Info of the bound mint
    pub fn mint_info(&self) -> &MintInfo {
        &self.mint_info
    }

    /// Seed material, if configured
    pub fn seed(&self) -> Option<&[u8]> {
        self.seed.as_deref()
    }

    /// Preferred denomination count, if configured
    pub fn denomination_target(&self) -> Option<u32> {
        self.denomination_target
    }

    /// The first active keyset matching the session's unit
    pub fn active_keyset(&self) -> Option<&KeysetDescriptor> {
        self.keysets.iter().find(|k| k.active && k.unit == self.unit)
    }
}
