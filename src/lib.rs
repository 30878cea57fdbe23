// Cashew - Local state layer for a Cashu ecash wallet
//
// Tracks which mints the wallet trusts, caches each mint's key material,
// and keeps the unspent proofs the wallet holds, partitioned by issuing mint.
// The cryptographic protocol, transport, and UI live outside this crate.

pub mod ledger;
pub mod mint;
pub mod storage;
pub mod wallet;
