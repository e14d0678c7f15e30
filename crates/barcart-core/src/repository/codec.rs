//! JSON encoding of records stored under a single key.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|e| StoreError::format(key, e))
}

pub(crate) fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::format(key, e))
}

/// Read and decode the record under `key`; `None` if never written.
pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(raw) => decode(key, &raw).map(Some),
        None => Ok(None),
    }
}

pub(crate) async fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = encode(key, value)?;
    store.set(key, raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_load_missing_and_present() {
        let store = MemoryStore::new();
        let missing: Option<Vec<u32>> = load(&store, "numbers").await.expect("load");
        assert_eq!(missing, None);

        save(&store, "numbers", &vec![1u32, 2, 3]).await.expect("save");
        let present: Option<Vec<u32>> = load(&store, "numbers").await.expect("load");
        assert_eq!(present, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_undecodable_is_format_error() {
        let store = MemoryStore::new();
        store.set("numbers", "{not json".to_string()).await.expect("set");
        let err = load::<Vec<u32>>(&store, "numbers").await.unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("numbers"));
    }
}
