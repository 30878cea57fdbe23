// Storage module - PERSISTENCE
// Handles durable key-value storage using sled

mod store;

pub use store::{StoreError, WalletStore};
