mod memory;

pub use memory::MemoryStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Get/put/scan capability over an ordered string key space.
///
/// Values are opaque bytes; callers own the encoding. `put` overwrites an
/// existing key silently. A durable backend is expected to implement this
/// same trait; the registry and ledger logic never sees anything else.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Every entry whose key starts with `prefix`, in key order. The whole
    /// result set is observed under one consistent snapshot: no write may
    /// be admitted mid-scan.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}
