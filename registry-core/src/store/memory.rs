use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::{KeyValueStore, StoreError};

/// In-memory store: an ordered map behind a shared-read / exclusive-write
/// lock. Scans hold the read guard for the whole walk, which gives the
/// consistent-snapshot guarantee the trait requires.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let guard = self.inner.read().await;
        let entries = guard
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_what_put_stored() {
        let store = MemoryStore::new();
        store.put("producer/p1", b"solar".to_vec()).await.unwrap();

        let value = store.get("producer/p1").await.unwrap();
        assert_eq!(value, Some(b"solar".to_vec()));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("producer/nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let store = MemoryStore::new();
        store.put("k", b"first".to_vec()).await.unwrap();
        store.put("k", b"second".to_vec()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn scan_prefix_returns_only_matching_keys_in_order() {
        let store = MemoryStore::new();
        store.put("grid-status/2", b"b".to_vec()).await.unwrap();
        store.put("grid-status/1", b"a".to_vec()).await.unwrap();
        store.put("producer/p1", b"x".to_vec()).await.unwrap();

        let entries = store.scan_prefix("grid-status/").await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["grid-status/1", "grid-status/2"]);
    }

    #[tokio::test]
    async fn scan_prefix_on_empty_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.scan_prefix("grid-status/").await.unwrap().is_empty());
    }
}
