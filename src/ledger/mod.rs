// Ledger module - WHAT WE HOLD
// Handles unspent proofs partitioned by mint, derived balances, and history

mod history;
mod proofs;

pub use history::{TransactionKind, TransactionRecord};
pub use proofs::{Proof, ProofLedger};
