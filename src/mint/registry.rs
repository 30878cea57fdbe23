// MintRegistry - Tracks configured mints, cached key material, and selection
//
// Metadata for a mint is only ever replaced as a whole unit by a completed
// sync; a failed or stale sync leaves the cache exactly as it was.

use super::client::{ClientError, MintClient};
use super::types::{MintConfig, MintMetadata};
use crate::storage::{StoreError, WalletStore};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors from mutating the configured-mint list
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Mint {url} is already configured")]
    DuplicateMint { url: String },

    #[error("Mint {url} is not configured")]
    UnknownMint { url: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from selecting the active mint
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Mint {requested} is not configured, fell back to {fallback:?}")]
    UnknownMint {
        requested: String,
        fallback: Option<String>,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from synchronizing a mint's metadata
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Mint {url} is not configured")]
    UnknownMint { url: String },

    #[error("Failed to fetch metadata for {url}")]
    Fetch {
        url: String,
        #[source]
        source: ClientError,
    },
}

/// Per-mint sync sequence numbers, last-writer-by-request-sequence
#[derive(Clone, Copy, Debug, Default)]
struct SyncSeq {
    issued: u64,
    applied: u64,
}

/// Registry of known mints and the single active mint
///
/// Owns the ordered MintConfig list, the per-mint metadata cache, and the
/// active pointer. The pointer always references a configured mint or is
/// None; every mutation re-establishes that invariant and persists the
/// affected record.
pub struct MintRegistry {
    store: Arc<WalletStore>,
    client: Arc<dyn MintClient>,
    mints: Vec<MintConfig>,
    metadata: HashMap<String, MintMetadata>,
    active_url: Option<String>,
    sync_seq: HashMap<String, SyncSeq>,
}

impl MintRegistry {
    /// Open the registry, hydrating configuration from the store
    pub fn open(store: Arc<WalletStore>, client: Arc<dyn MintClient>) -> Result<Self, StoreError> {
        let mints = store.load_mint_configs()?;
        let active_url = store.load_active_mint()?;

        let mut registry = Self {
            store,
            client,
            mints,
            metadata: HashMap::new(),
            active_url,
            sync_seq: HashMap::new(),
        };
        registry.normalize_active()?;
        Ok(registry)
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// All configured mints, in insertion order
    pub fn list_mints(&self) -> &[MintConfig] {
        &self.mints
    }

    /// Whether a url is a configured mint
    pub fn contains(&self, url: &str) -> bool {
        self.mints.iter().any(|m| m.url == url)
    }

    /// Whether no mints are configured
    pub fn is_empty(&self) -> bool {
        self.mints.is_empty()
    }

    /// The active mint's url, if any
    pub fn active_mint_url(&self) -> Option<&str> {
        self.active_url.as_deref()
    }

    /// The active mint's configuration, derived from the pointer
    pub fn active_mint(&self) -> Option<&MintConfig> {
        let url = self.active_url.as_deref()?;
        self.mints.iter().find(|m| m.url == url)
    }

    /// The active mint's cached metadata, if it has been synced
    pub fn active_mint_metadata(&self) -> Option<&MintMetadata> {
        self.metadata.get(self.active_url.as_deref()?)
    }

    /// Cached metadata for any configured mint
    pub fn metadata_for(&self, url: &str) -> Option<&MintMetadata> {
        self.metadata.get(url)
    }

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    /// Add a mint and sync its metadata
    ///
    /// A duplicate url leaves the registry untouched and is reported as
    /// `ConfigError::DuplicateMint`. The first mint added becomes active.
    /// A failed initial sync is logged, not returned; the mint stays
    /// configured and can be synced again later.
    pub async fn add_mint(&mut self, config: MintConfig) -> Result<(), ConfigError> {
        if self.contains(&config.url) {
            debug!(url = %config.url, "Mint already configured");
            return Err(ConfigError::DuplicateMint { url: config.url });
        }

        let url = config.url.clone();
        self.mints.push(config);
        self.store.save_mint_configs(&self.mints)?;

        if self.active_url.is_none() {
            self.active_url = Some(url.clone());
            self.store.save_active_mint(&self.active_url)?;
        }
        info!(%url, "Mint added");

        if let Err(e) = self.sync_mint(&url).await {
            warn!(%url, error = %e, "Initial sync failed");
        }
        Ok(())
    }

    /// Remove a mint, discarding its cached metadata
    ///
    /// If the removed mint was active, the first remaining mint becomes
    /// active, or the pointer clears when the registry is now empty.
    pub fn remove_mint(&mut self, url: &str) -> Result<(), ConfigError> {
        if !self.contains(url) {
            return Err(ConfigError::UnknownMint {
                url: url.to_string(),
            });
        }

        self.mints.retain(|m| m.url != url);
        self.metadata.remove(url);
        self.sync_seq.remove(url);
        self.store.save_mint_configs(&self.mints)?;
        info!(%url, "Mint removed");

        if self.active_url.as_deref() == Some(url) {
            self.active_url = self.mints.first().map(|m| m.url.clone());
            self.store.save_active_mint(&self.active_url)?;
            info!(active = ?self.active_url, "Active mint re-selected");
        }
        Ok(())
    }

    /// Select the active mint
    ///
    /// An unknown url normalizes the pointer to the first configured mint
    /// and reports a `SelectionError`, so the pointer never dangles.
    pub fn select_mint(&mut self, url: &str) -> Result<(), SelectionError> {
        if self.contains(url) {
            self.active_url = Some(url.to_string());
            self.store.save_active_mint(&self.active_url)?;
            info!(%url, "Mint selected");
            return Ok(());
        }

        let fallback = self.mints.first().map(|m| m.url.clone());
        self.active_url = fallback.clone();
        self.store.save_active_mint(&self.active_url)?;
        warn!(requested = %url, ?fallback, "Unknown mint selected, falling back");

        Err(SelectionError::UnknownMint {
            requested: url.to_string(),
            fallback,
        })
    }

    /// Re-establish the active-pointer invariant after external hydration
    fn normalize_active(&mut self) -> Result<(), StoreError> {
        let valid = self
            .active_url
            .as_deref()
            .is_some_and(|url| self.contains(url));
        if valid {
            return Ok(());
        }

        let fallback = self.mints.first().map(|m| m.url.clone());
        if self.active_url != fallback {
            warn!(stale = ?self.active_url, ?fallback, "Normalizing active mint pointer");
            self.active_url = fallback;
            self.store.save_active_mint(&self.active_url)?;
        }
        Ok(())
    }

    // ========================================================================
    // SYNCHRONIZATION
    // ========================================================================

    /// Issue a sync sequence number for a mint
    ///
    /// Completions are applied in request-sequence order: a slow early
    /// request can never clobber a later one that already completed.
    pub fn begin_sync(&mut self, url: &str) -> u64 {
        let seq = self.sync_seq.entry(url.to_string()).or_default();
        seq.issued += 1;
        seq.issued
    }

    /// Apply a completed sync, returning whether it was accepted
    ///
    /// Results for mints that were removed mid-flight, and results whose
    /// sequence is older than one already applied, are discarded.
    pub fn complete_sync(&mut self, url: &str, seq: u64, metadata: MintMetadata) -> bool {
        if !self.contains(url) {
            warn!(%url, "Discarding sync result for removed mint");
            return false;
        }

        let entry = self.sync_seq.entry(url.to_string()).or_default();
        if seq <= entry.applied {
            warn!(%url, seq, applied = entry.applied, "Discarding stale sync result");
            return false;
        }

        entry.applied = seq;
        self.metadata.insert(url.to_string(), metadata);
        info!(%url, "Mint metadata updated");
        true
    }

    /// Fetch and atomically replace one mint's metadata
    pub async fn sync_mint(&mut self, url: &str) -> Result<(), SyncError> {
        if !self.contains(url) {
            return Err(SyncError::UnknownMint {
                url: url.to_string(),
            });
        }

        info!(%url, "Syncing mint");
        let seq = self.begin_sync(url);

        match fetch_metadata(self.client.as_ref(), url).await {
            Ok(metadata) => {
                self.complete_sync(url, seq, metadata);
                Ok(())
            }
            Err(e) => {
                warn!(%url, error = %e, "Mint sync failed");
                Err(e)
            }
        }
    }

    /// Sync every configured mint, fetching concurrently
    ///
    /// Failures are isolated per mint and logged; one mint's failure never
    /// aborts the others, and no aggregate error is raised.
    pub async fn sync_all(&mut self) {
        let urls: Vec<String> = self.mints.iter().map(|m| m.url.clone()).collect();
        info!(count = urls.len(), "Syncing all mints");

        let mut tasks: JoinSet<(String, u64, Result<MintMetadata, SyncError>)> = JoinSet::new();
        for url in urls {
            let seq = self.begin_sync(&url);
            let client = Arc::clone(&self.client);
            tasks.spawn(async move {
                let result = fetch_metadata(client.as_ref(), &url).await;
                (url, seq, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, seq, Ok(metadata))) => {
                    self.complete_sync(&url, seq, metadata);
                }
                Ok((url, _, Err(e))) => warn!(%url, error = %e, "Mint sync failed"),
                Err(e) => warn!(error = %e, "Sync task failed to join"),
            }
        }
    }
}

/// Run the three metadata fetches against the client
///
/// Any failure aborts the round-trip before a MintMetadata exists, so the
/// caller's cache cannot be partially overwritten.
async fn fetch_metadata(client: &dyn MintClient, url: &str) -> Result<MintMetadata, SyncError> {
    let fetch_err = |source: ClientError| SyncError::Fetch {
        url: url.to_string(),
        source,
    };

    let info = client.get_info(url).await.map_err(fetch_err)?;
    let keysets = client.get_keysets(url).await.map_err(fetch_err)?;
    let keys = client.get_keys(url).await.map_err(fetch_err)?;

    Ok(MintMetadata {
        url: url.to_string(),
        info,
        keys,
        keysets,
        synced_at: Utc::now(),
    })
}
