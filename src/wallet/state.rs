// Wallet - the dependency-injected state object for the whole layer
//
// Construction order is fixed: durable store, then mint registry, then
// proof ledger, then (on demand) the wallet session.

use crate::ledger::ProofLedger;
use crate::mint::{default_mints, MintClient, MintRegistry, SelectionError};
use crate::storage::{StoreError, WalletStore};
use crate::wallet::session::{WalletOptions, WalletSession};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Top-level wallet state: store, registry, ledger, and the bound session
pub struct Wallet {
    store: Arc<WalletStore>,
    registry: MintRegistry,
    ledger: ProofLedger,
    session: Option<WalletSession>,
}

impl Wallet {
    /// Open the wallet state at a storage path
    ///
    /// A fresh store is seeded with the default mint list before the
    /// registry hydrates, so a new wallet starts with known-good mints.
    pub fn open<P: AsRef<Path>>(
        path: P,
        client: Arc<dyn MintClient>,
    ) -> Result<Self, StoreError> {
        let store = Arc::new(WalletStore::open(path)?);

        if store.load_mint_configs()?.is_empty() {
            let defaults = default_mints();
            info!(count = defaults.len(), "Seeding default mints");
            store.save_mint_configs(&defaults)?;
        }

        let registry = MintRegistry::open(Arc::clone(&store), client)?;
        let ledger = ProofLedger::open(Arc::clone(&store))?;

        Ok(Self {
            store,
            registry,
            ledger,
            session: None,
        })
    }

    /// Sync every configured mint and bind a session to the active one
    pub async fn init(&mut self) {
        self.registry.sync_all().await;
        self.rebind_session(WalletOptions::default());
    }

    /// Select the active mint and rebind the session
    ///
    /// The previous session is discarded either way; a selection error is
    /// reported after the fallback mint has been bound.
    pub fn select_mint(&mut self, url: &str) -> Result<(), SelectionError> {
        let result = self.registry.select_mint(url);
        self.rebind_session(WalletOptions::default());
        result
    }

    /// Rebuild the session against the active mint's current metadata
    ///
    /// Clears the session when the active mint has no synced metadata yet.
    pub fn rebind_session(&mut self, options: WalletOptions) {
        self.session = self
            .registry
            .active_mint_metadata()
            .map(|metadata| WalletSession::bind(metadata, options));
    }

    /// Spendable balance at the active mint
    pub fn balance(&self) -> u64 {
        match self.registry.active_mint_url() {
            Some(url) => self.ledger.balance_for(url),
            None => 0,
        }
    }

    /// The durable store backing this wallet
    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    /// The mint registry
    pub fn registry(&self) -> &MintRegistry {
        &self.registry
    }

    /// Mutable access to the mint registry
    pub fn registry_mut(&mut self) -> &mut MintRegistry {
        &mut self.registry
    }

    /// The proof ledger
    pub fn ledger(&self) -> &ProofLedger {
        &self.ledger
    }

    /// Mutable access to the proof ledger
    pub fn ledger_mut(&mut self) -> &mut ProofLedger {
        &mut self.ledger
    }

    /// The currently bound session, if any
    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }
}
