use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::StoreResult;

/// Non-durable store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("favorites").await.ok(), Some(None));

        store.set("favorites", "[]".to_string()).await.expect("set");
        assert_eq!(store.get("favorites").await.ok(), Some(Some("[]".to_string())));
        assert_eq!(store.len().await, 1);

        store.remove("favorites").await.expect("remove");
        store.remove("favorites").await.expect("second remove is a no-op");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_many() {
        let store = MemoryStore::new();
        store.set("a", "1".to_string()).await.expect("set");
        store.set("b", "2".to_string()).await.expect("set");
        store.set("c", "3".to_string()).await.expect("set");

        store.remove_many(&["a", "b"]).await.expect("remove_many");
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("c").await.ok(), Some(Some("3".to_string())));
    }
}
