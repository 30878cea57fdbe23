// Mint module - WHO WE TRUST
// Handles the mint registry, key material synchronization, and selection

mod client;
mod registry;
mod types;

pub use client::{ClientError, MintClient, MockMintClient};
pub use registry::{ConfigError, MintRegistry, SelectionError, SyncError};
pub use types::{
    default_mints, KeySet, KeysetDescriptor, MintConfig, MintInfo, MintMetadata,
};
