// WalletStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - Configured mints
// - The active mint pointer
// - Proofs partitioned by mint
// - Transaction history

use crate::ledger::{Proof, TransactionRecord};
use crate::mint::MintConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Keys for the logical records, one record per key
mod keys {
    pub const MINTS_CONFIG: &[u8] = b"mints:config";
    pub const MINTS_ACTIVE_URL: &[u8] = b"mints:active_url";
    pub const LEDGER_PROOFS: &[u8] = b"ledger:proofs_by_mint";
    pub const LEDGER_TRANSACTIONS: &[u8] = b"ledger:transactions";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Durable key-value store for wallet state
///
/// Uses sled for crash-safe, embedded storage. Every record is written as a
/// whole unit, so readers never observe a partially updated value.
pub struct WalletStore {
    db: sled::Db,
}

impl WalletStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    // ========================================================================
    // GENERIC REPOSITORY OPERATIONS
    // ========================================================================

    /// Save a value under a key, replacing any previous record
    pub fn save<T: Serialize>(&self, key: &[u8], value: &T) -> Result<(), StoreError> {
        let bytes = postcard::to_allocvec(value)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.db.insert(key, bytes)?;
        Ok(())
    }

    /// Load a value by key, or None if the key has never been written
    pub fn load<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.db.get(key)? {
            Some(bytes) => {
                let value = postcard::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete a key
    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    // ========================================================================
    // MINT REGISTRY PERSISTENCE
    // ========================================================================

    /// Save the ordered list of configured mints
    pub fn save_mint_configs(&self, mints: &[MintConfig]) -> Result<(), StoreError> {
        self.save(keys::MINTS_CONFIG, &mints.to_vec())
    }

    /// Load the ordered list of configured mints
    pub fn load_mint_configs(&self) -> Result<Vec<MintConfig>, StoreError> {
        Ok(self.load(keys::MINTS_CONFIG)?.unwrap_or_default())
    }

    /// Save the active mint pointer
    pub fn save_active_mint(&self, url: &Option<String>) -> Result<(), StoreError> {
        self.save(keys::MINTS_ACTIVE_URL, url)
    }

    /// Load the active mint pointer
    pub fn load_active_mint(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load(keys::MINTS_ACTIVE_URL)?.flatten())
    }

    // ========================================================================
    // PROOF LEDGER PERSISTENCE
    // ========================================================================

    /// Save the proofs-by-mint mapping
    pub fn save_proofs(&self, proofs: &HashMap<String, Vec<Proof>>) -> Result<(), StoreError> {
        self.save(keys::LEDGER_PROOFS, proofs)
    }

    /// Load the proofs-by-mint mapping
    pub fn load_proofs(&self) -> Result<HashMap<String, Vec<Proof>>, StoreError> {
        Ok(self.load(keys::LEDGER_PROOFS)?.unwrap_or_default())
    }

    /// Save the transaction history
    pub fn save_transactions(&self, records: &[TransactionRecord]) -> Result<(), StoreError> {
        self.save(keys::LEDGER_TRANSACTIONS, &records.to_vec())
    }

    /// Load the transaction history
    pub fn load_transactions(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.load(keys::LEDGER_TRANSACTIONS)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_basic() {
        let temp_dir = TempDir::new().unwrap();
        let store = WalletStore::open(temp_dir.path()).unwrap();

        store.save(b"test", &"value".to_string()).unwrap();
        let result: Option<String> = store.load(b"test").unwrap();

        assert_eq!(result, Some("value".to_string()));
    }

    #[test]
    fn test_store_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = WalletStore::open(temp_dir.path()).unwrap();
            store.save(b"persist", &42u64).unwrap();
            store.flush().unwrap();
        }

        {
            let store = WalletStore::open(temp_dir.path()).unwrap();
            let result: Option<u64> = store.load(b"persist").unwrap();
            assert_eq!(result, Some(42));
        }
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = WalletStore::open(temp_dir.path()).unwrap();

        let result: Option<String> = store.load(b"nonexistent").unwrap();
        assert_eq!(result, None);
    }
}
