//! Persistent key/value substrate.
//!
//! The cache and history layers sit on top of this seam; the host picks
//! the implementation (durable SQLite, or in-memory for tests and
//! ephemeral sessions). Keys are namespaced by prefix so several layers
//! can share one substrate.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A generic persistent key/value store supplied by the host.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write or overwrite one value.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove one value. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// All `(key, value)` pairs whose key starts with `prefix`.
    async fn entries(&self, prefix: &str) -> Result<Vec<(String, String)>>;

    /// Remove every key starting with `prefix`.
    async fn clear(&self, prefix: &str) -> Result<()>;
}

/// In-memory substrate backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn clear(&self, prefix: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryStore::new();
        store.put("links/a", "1").await.unwrap();
        assert_eq!(store.get("links/a").await.unwrap().as_deref(), Some("1"));
        store.delete("links/a").await.unwrap();
        assert_eq!(store.get("links/a").await.unwrap(), None);
        // Deleting again is fine.
        store.delete("links/a").await.unwrap();
    }

    #[tokio::test]
    async fn entries_and_clear_are_prefix_scoped() {
        let store = MemoryStore::new();
        store.put("links/a", "1").await.unwrap();
        store.put("links/b", "2").await.unwrap();
        store.put("history/a", "3").await.unwrap();

        assert_eq!(store.entries("links/").await.unwrap().len(), 2);
        store.clear("links/").await.unwrap();
        assert_eq!(store.entries("links/").await.unwrap().len(), 0);
        assert_eq!(store.entries("history/").await.unwrap().len(), 1);
    }
}
