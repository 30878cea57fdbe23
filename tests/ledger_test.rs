// Ledger Tests
// Tests for proof bookkeeping, derived balances, and transaction history

use cashew::ledger::{Proof, ProofLedger, TransactionKind};
use cashew::storage::WalletStore;
use std::sync::Arc;
use tempfile::TempDir;

const MINT_A: &str = "https://a.example";
const MINT_B: &str = "https://b.example";

fn open_ledger() -> (TempDir, ProofLedger) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
    let ledger = ProofLedger::open(store).unwrap();
    (temp_dir, ledger)
}

// ============================================================================
// READS ARE TOTAL
// ============================================================================

#[test]
fn test_unknown_mint_yields_empty_proofs() {
    let (_dir, ledger) = open_ledger();

    assert!(ledger.proofs_for(MINT_A).is_empty());
    assert_eq!(ledger.balance_for(MINT_A), 0);
    assert_eq!(ledger.total_balance(), 0);
    assert_eq!(ledger.mints().count(), 0);
}

#[test]
fn test_remove_from_unknown_mint_succeeds_silently() {
    let (_dir, mut ledger) = open_ledger();

    let removed = ledger.remove_proofs(MINT_A, |_| true).unwrap();
    assert!(removed.is_empty());
}

// ============================================================================
// ADD AND REMOVE
// ============================================================================

#[test]
fn test_add_then_remove_by_secret() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(
            MINT_A,
            vec![
                Proof::new(4, "s-four", "c1", "ks0"),
                Proof::new(2, "s-two", "c2", "ks0"),
            ],
        )
        .unwrap();

    let removed = ledger
        .remove_proofs_by_secret(MINT_A, &["s-four".to_string()])
        .unwrap();

    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].amount, 4);
    assert_eq!(ledger.balance_for(MINT_A), 2);
}

#[test]
fn test_remove_by_predicate() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(
            MINT_A,
            vec![
                Proof::new(1, "s1", "c1", "ks0"),
                Proof::new(2, "s2", "c2", "ks0"),
                Proof::new(8, "s3", "c3", "ks0"),
            ],
        )
        .unwrap();

    let removed = ledger.remove_proofs(MINT_A, |p| p.amount < 4).unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(ledger.balance_for(MINT_A), 8);
}

#[test]
fn test_remove_with_no_match_changes_nothing() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(MINT_A, vec![Proof::new(4, "s1", "c1", "ks0")])
        .unwrap();
    let removed = ledger
        .remove_proofs_by_secret(MINT_A, &["missing".to_string()])
        .unwrap();

    assert!(removed.is_empty());
    assert_eq!(ledger.balance_for(MINT_A), 4);
}

#[test]
fn test_proofs_are_partitioned_by_mint() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(MINT_A, vec![Proof::new(4, "s1", "c1", "ks0")])
        .unwrap();
    ledger
        .add_proofs(MINT_B, vec![Proof::new(16, "s2", "c2", "ks1")])
        .unwrap();

    assert_eq!(ledger.balance_for(MINT_A), 4);
    assert_eq!(ledger.balance_for(MINT_B), 16);
    assert_eq!(ledger.total_balance(), 20);

    // Removing at one mint never touches the other
    ledger.remove_proofs(MINT_A, |_| true).unwrap();
    assert_eq!(ledger.balance_for(MINT_A), 0);
    assert_eq!(ledger.balance_for(MINT_B), 16);
}

#[test]
fn test_same_secret_can_exist_under_different_mints() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(MINT_A, vec![Proof::new(4, "shared", "c1", "ks0")])
        .unwrap();
    let accepted = ledger
        .add_proofs(MINT_B, vec![Proof::new(4, "shared", "c1", "ks0")])
        .unwrap();

    // Dedup is per mint; cross-mint attribution is the protocol's concern
    assert_eq!(accepted, 1);
}

#[test]
fn test_duplicate_redemption_does_not_inflate_balance() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .add_proofs(MINT_A, vec![Proof::new(4, "s1", "c1", "ks0")])
        .unwrap();
    let accepted = ledger
        .add_proofs(MINT_A, vec![Proof::new(4, "s1", "c1", "ks0")])
        .unwrap();

    assert_eq!(accepted, 0);
    assert_eq!(ledger.balance_for(MINT_A), 4);
}

// ============================================================================
// BALANCE IS ALWAYS DERIVED
// ============================================================================

#[test]
fn test_balance_tracks_every_mutation() {
    let (_dir, mut ledger) = open_ledger();

    for i in 0..10u64 {
        ledger
            .add_proofs(MINT_A, vec![Proof::new(1 << i, format!("s{i}"), "c", "ks0")])
            .unwrap();
        let expected: u64 = ledger.proofs_for(MINT_A).iter().map(|p| p.amount).sum();
        assert_eq!(ledger.balance_for(MINT_A), expected);
    }

    for i in (0..10u64).rev() {
        ledger
            .remove_proofs_by_secret(MINT_A, &[format!("s{i}")])
            .unwrap();
        let expected: u64 = ledger.proofs_for(MINT_A).iter().map(|p| p.amount).sum();
        assert_eq!(ledger.balance_for(MINT_A), expected);
    }

    assert_eq!(ledger.balance_for(MINT_A), 0);
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[test]
fn test_ledger_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
        let mut ledger = ProofLedger::open(store.clone()).unwrap();
        ledger
            .add_proofs(
                MINT_A,
                vec![
                    Proof::new(4, "s1", "c1", "ks0"),
                    Proof::new(2, "s2", "c2", "ks0"),
                ],
            )
            .unwrap();
        ledger
            .remove_proofs_by_secret(MINT_A, &["s2".to_string()])
            .unwrap();
        store.flush().unwrap();
    }

    {
        let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
        let ledger = ProofLedger::open(store).unwrap();

        assert_eq!(ledger.balance_for(MINT_A), 4);
        assert_eq!(ledger.proofs_for(MINT_A)[0].secret, "s1");
    }
}

// ============================================================================
// TRANSACTION HISTORY
// ============================================================================

#[test]
fn test_transaction_history_is_append_only_and_filterable() {
    let (_dir, mut ledger) = open_ledger();

    ledger
        .record_transaction("tx-1", MINT_A, 21, TransactionKind::Minted)
        .unwrap();
    ledger
        .record_transaction("tx-2", MINT_B, 8, TransactionKind::Redeemed)
        .unwrap();
    ledger
        .record_transaction("tx-3", MINT_A, 5, TransactionKind::Sent)
        .unwrap();

    assert_eq!(ledger.transactions().len(), 3);
    let for_a = ledger.transactions_for(MINT_A);
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].id, "tx-1");
    assert_eq!(for_a[1].kind, TransactionKind::Sent);
}

#[test]
fn test_transaction_history_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
        let mut ledger = ProofLedger::open(store.clone()).unwrap();
        ledger
            .record_transaction("tx-1", MINT_A, 21, TransactionKind::Minted)
            .unwrap();
        store.flush().unwrap();
    }

    {
        let store = Arc::new(WalletStore::open(temp_dir.path()).unwrap());
        let ledger = ProofLedger::open(store).unwrap();
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.transactions()[0].amount, 21);
    }
}
