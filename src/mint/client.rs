// MintClient - the network-facing collaborator interface
// The registry only needs the three read endpoints a Cashu mint exposes;
// the actual HTTP transport lives outside this crate.

use super::types::{KeySet, KeysetDescriptor, MintInfo};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Errors from fetching mint metadata
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Transport failure talking to {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

// ============================================================================
// MINT CLIENT TRAIT
// ============================================================================

/// Read interface to a Cashu mint
#[async_trait]
pub trait MintClient: Send + Sync {
    /// Fetch the mint's self-description
    async fn get_info(&self, url: &str) -> Result<MintInfo, ClientError>;

    /// Fetch the mint's keyset listing
    async fn get_keysets(&self, url: &str) -> Result<Vec<KeysetDescriptor>, ClientError>;

    /// Fetch the mint's full key sets
    async fn get_keys(&self, url: &str) -> Result<Vec<KeySet>, ClientError>;
}

// ============================================================================
// MOCK MINT CLIENT
// ============================================================================

/// Scripted responses for one mint
#[derive(Clone, Debug)]
struct ScriptedMint {
    info: MintInfo,
    keysets: Vec<KeysetDescriptor>,
    keys: Vec<KeySet>,
}

/// Mock implementation of MintClient for testing
///
/// Unknown urls fail with a transport error; individual endpoints can be
/// forced to fail per url, and an optional delay simulates slow mints.
pub struct MockMintClient {
    mints: HashMap<String, ScriptedMint>,
    fail_info: HashSet<String>,
    fail_keysets: HashSet<String>,
    fail_keys: HashSet<String>,
    delay_ms: u64,
    call_count: AtomicUsize,
}

impl MockMintClient {
    /// Create a mock with no known mints
    pub fn new() -> Self {
        Self {
            mints: HashMap::new(),
            fail_info: HashSet::new(),
            fail_keysets: HashSet::new(),
            fail_keys: HashSet::new(),
            delay_ms: 0,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Script a fully specified mint
    pub fn with_mint(
        mut self,
        url: &str,
        info: MintInfo,
        keysets: Vec<KeysetDescriptor>,
        keys: Vec<KeySet>,
    ) -> Self {
        self.mints.insert(
            url.to_string(),
            ScriptedMint {
                info,
                keysets,
                keys,
            },
        );
        self
    }

    /// Script a mint with stock healthy metadata
    pub fn with_healthy_mint(self, url: &str, name: &str) -> Self {
        let keyset_id = format!("{name}-keyset-00");
        let mut keys = BTreeMap::new();
        keys.insert(1, "02a1".to_string());
        keys.insert(2, "02a2".to_string());
        keys.insert(4, "02a4".to_string());
        keys.insert(8, "02a8".to_string());

        self.with_mint(
            url,
            MintInfo::named(name),
            vec![KeysetDescriptor {
                id: keyset_id.clone(),
                unit: "sat".to_string(),
                active: true,
            }],
            vec![KeySet {
                id: keyset_id,
                unit: "sat".to_string(),
                keys,
            }],
        )
    }

    /// Force the info endpoint to fail for a url
    pub fn with_info_failure(mut self, url: &str) -> Self {
        self.fail_info.insert(url.to_string());
        self
    }

    /// Force the keyset listing to fail for a url
    pub fn with_keysets_failure(mut self, url: &str) -> Self {
        self.fail_keysets.insert(url.to_string());
        self
    }

    /// Force the keys endpoint to fail for a url
    pub fn with_keys_failure(mut self, url: &str) -> Self {
        self.fail_keys.insert(url.to_string());
        self
    }

    /// Add a delay before every response
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Number of endpoint calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    async fn respond<T>(
        &self,
        url: &str,
        forced_failure: bool,
        value: Option<T>,
    ) -> Result<T, ClientError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if forced_failure {
            return Err(ClientError::Transport {
                url: url.to_string(),
                reason: "Scripted failure".to_string(),
            });
        }

        value.ok_or_else(|| ClientError::Transport {
            url: url.to_string(),
            reason: "Unknown mint".to_string(),
        })
    }
}

impl Default for MockMintClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MintClient for MockMintClient {
    async fn get_info(&self, url: &str) -> Result<MintInfo, ClientError> {
        let value = self.mints.get(url).map(|m| m.info.clone());
        self.respond(url, self.fail_info.contains(url), value).await
    }

    async fn get_keysets(&self, url: &str) -> Result<Vec<KeysetDescriptor>, ClientError> {
        let value = self.mints.get(url).map(|m| m.keysets.clone());
        self.respond(url, self.fail_keysets.contains(url), value)
            .await
    }

    async fn get_keys(&self, url: &str) -> Result<Vec<KeySet>, ClientError> {
        let value = self.mints.get(url).map(|m| m.keys.clone());
        self.respond(url, self.fail_keys.contains(url), value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_unknown_mint_fails() {
        let client = MockMintClient::new();
        let result = client.get_info("https://unknown.example").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_healthy_mint_responds() {
        let client = MockMintClient::new().with_healthy_mint("https://a.example", "A");

        let info = client.get_info("https://a.example").await.unwrap();
        assert_eq!(info.name, "A");

        let keysets = client.get_keysets("https://a.example").await.unwrap();
        assert!(keysets[0].active);

        let keys = client.get_keys("https://a.example").await.unwrap();
        assert_eq!(keys[0].keys.len(), 4);
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_forced_failure() {
        let client = MockMintClient::new()
            .with_healthy_mint("https://a.example", "A")
            .with_keys_failure("https://a.example");

        assert!(client.get_info("https://a.example").await.is_ok());
        assert!(client.get_keys("https://a.example").await.is_err());
    }
}
