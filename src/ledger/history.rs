// Transaction history - append-only record of value moving through the wallet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a transaction did to the wallet's holdings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Proofs handed to someone else
    Sent,
    /// Proofs received from someone else
    Redeemed,
    /// Proofs freshly issued by a mint
    Minted,
}

/// One entry in the wallet's transaction history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub mint_url: String,
    pub amount: u64,
    pub kind: TransactionKind,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Create a record stamped with the current time
    pub fn now(
        id: impl Into<String>,
        mint_url: impl Into<String>,
        amount: u64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: id.into(),
            mint_url: mint_url.into(),
            amount,
            kind,
            timestamp: Utc::now(),
        }
    }
}
