// ProofLedger - Unspent bearer tokens, partitioned by issuing mint
//
// Proofs are immutable once stored; spending a proof means removing it.
// Balances are always recomputed from the live proof set, never cached,
// so a reader can never see a removed proof still counted.

use super::history::{TransactionKind, TransactionRecord};
use crate::storage::{StoreError, WalletStore};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// A bearer token issued by a mint
///
/// Identified by its secret; the unblinded signature `c` and the keyset id
/// belong to the external cryptographic protocol and are carried opaquely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub amount: u64,
    pub secret: String,
    pub c: String,
    pub keyset_id: String,
}

impl Proof {
    pub fn new(
        amount: u64,
        secret: impl Into<String>,
        c: impl Into<String>,
        keyset_id: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            secret: secret.into(),
            c: c.into(),
            keyset_id: keyset_id.into(),
        }
    }
}

/// Mapping from mint url to the unspent proofs held from that mint
///
/// Every mutation updates the in-memory map and then persists the whole
/// mapping as one record. A proof is attributed to exactly one mint.
pub struct ProofLedger {
    store: Arc<WalletStore>,
    proofs: HashMap<String, Vec<Proof>>,
    transactions: Vec<TransactionRecord>,
}

impl ProofLedger {
    /// Open the ledger, hydrating proofs and history from the store
    pub fn open(store: Arc<WalletStore>) -> Result<Self, StoreError> {
        let proofs = store.load_proofs()?;
        let transactions = store.load_transactions()?;
        Ok(Self {
            store,
            proofs,
            transactions,
        })
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Proofs held from a mint; empty for unknown mints, never absent
    pub fn proofs_for(&self, mint_url: &str) -> &[Proof] {
        self.proofs.get(mint_url).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Spendable balance at a mint, recomputed from the live proof set
    pub fn balance_for(&self, mint_url: &str) -> u64 {
        self.proofs_for(mint_url).iter().map(|p| p.amount).sum()
    }

    /// Spendable balance across all mints
    pub fn total_balance(&self) -> u64 {
        self.proofs
            .values()
            .flat_map(|proofs| proofs.iter())
            .map(|p| p.amount)
            .sum()
    }

    /// Urls of mints the ledger holds proofs from
    pub fn mints(&self) -> impl Iterator<Item = &str> {
        self.proofs
            .iter()
            .filter(|(_, proofs)| !proofs.is_empty())
            .map(|(url, _)| url.as_str())
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Append proofs for a mint, returning how many were accepted
    ///
    /// Proofs whose secret is already held for that mint are skipped, so
    /// redeeming the same token twice cannot inflate the balance.
    pub fn add_proofs(
        &mut self,
        mint_url: &str,
        proofs: Vec<Proof>,
    ) -> Result<usize, StoreError> {
        let held = self.proofs.entry(mint_url.to_string()).or_default();
        let mut known: HashSet<String> = held.iter().map(|p| p.secret.clone()).collect();

        let mut accepted = 0;
        let mut skipped = 0;
        for proof in proofs {
            if !known.insert(proof.secret.clone()) {
                skipped += 1;
                continue;
            }
            held.push(proof);
            accepted += 1;
        }
        if skipped > 0 {
            warn!(mint = %mint_url, skipped, "Skipped proofs already held");
        }

        self.persist()?;
        debug!(mint = %mint_url, accepted, "Proofs added");
        Ok(accepted)
    }

    /// Remove proofs matching a predicate, returning the removed proofs
    ///
    /// Succeeds silently when nothing matches.
    pub fn remove_proofs<F>(
        &mut self,
        mint_url: &str,
        predicate: F,
    ) -> Result<Vec<Proof>, StoreError>
    where
        F: Fn(&Proof) -> bool,
    {
        let Some(held) = self.proofs.remove(mint_url) else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(held.len());
        for proof in held {
            if predicate(&proof) {
                removed.push(proof);
            } else {
                kept.push(proof);
            }
        }

        if !kept.is_empty() {
            self.proofs.insert(mint_url.to_string(), kept);
        }

        if !removed.is_empty() {
            self.persist()?;
            debug!(mint = %mint_url, removed = removed.len(), "Proofs removed");
        }
        Ok(removed)
    }

    /// Remove proofs by their secrets
    pub fn remove_proofs_by_secret(
        &mut self,
        mint_url: &str,
        secrets: &[String],
    ) -> Result<Vec<Proof>, StoreError> {
        self.remove_proofs(mint_url, |p| secrets.contains(&p.secret))
    }

    // ========================================================================
    // TRANSACTION HISTORY
    // ========================================================================

    /// Append a transaction record and persist the history
    pub fn record_transaction(
        &mut self,
        id: impl Into<String>,
        mint_url: &str,
        amount: u64,
        kind: TransactionKind,
    ) -> Result<(), StoreError> {
        self.transactions
            .push(TransactionRecord::now(id, mint_url, amount, kind));
        self.store.save_transactions(&self.transactions)
    }

    /// The full transaction history, oldest first
    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Transactions involving one mint, oldest first
    pub fn transactions_for(&self, mint_url: &str) -> Vec<&TransactionRecord> {
        self.transactions
            .iter()
            .filter(|t| t.mint_url == mint_url)
            .collect()
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.save_proofs(&self.proofs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger() -> (TempDir, ProofLedger) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
        let ledger = ProofLedger::open(store).unwrap();
        (temp_dir, ledger)
    }

    #[test]
    fn test_unknown_mint_has_empty_proofs_and_zero_balance() {
        let (_dir, ledger) = ledger();

        assert!(ledger.proofs_for("https://a.example").is_empty());
        assert_eq!(ledger.balance_for("https://a.example"), 0);
    }

    #[test]
    fn test_balance_is_sum_of_amounts() {
        let (_dir, mut ledger) = ledger();

        ledger
            .add_proofs(
                "https://a.example",
                vec![
                    Proof::new(4, "s1", "c1", "ks0"),
                    Proof::new(2, "s2", "c2", "ks0"),
                ],
            )
            .unwrap();

        assert_eq!(ledger.balance_for("https://a.example"), 6);
    }

    #[test]
    fn test_duplicate_secret_is_skipped() {
        let (_dir, mut ledger) = ledger();

        let accepted = ledger
            .add_proofs(
                "https://a.example",
                vec![
                    Proof::new(4, "s1", "c1", "ks0"),
                    Proof::new(4, "s1", "c1", "ks0"),
                ],
            )
            .unwrap();

        assert_eq!(accepted, 1);
        assert_eq!(ledger.balance_for("https://a.example"), 4);
    }
}
