use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// Stores each key as `<dir>/<key>.json`.
///
/// Each write goes to its own temporary file in the same directory, which is
/// then renamed over the target. A crash mid-write leaves the previous value
/// intact, and concurrent writers to one key never share a temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StoreError::storage(&format!("Failed to create {}", dir.display()), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    fn path(&self, key: &str) -> StoreResult<PathBuf> {
        if !Self::is_valid_key(key) {
            return Err(StoreError::Storage(format!("Invalid storage key: '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(&format!("Failed to read '{}'", key), e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let path = self.path(key)?;
        let dir = self.dir.clone();
        let context = format!("Failed to write '{}'", key);

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::storage(&context, e))?
        .map_err(|e| StoreError::storage(&context, e))?;

        debug!(key = key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(&format!("Failed to remove '{}'", key), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(FileStore::is_valid_key("user_preferences"));
        assert!(FileStore::is_valid_key("favorites-v2"));

        assert!(!FileStore::is_valid_key(""));
        assert!(!FileStore::is_valid_key("../escape"));
        assert!(!FileStore::is_valid_key("a/b"));
        assert!(!FileStore::is_valid_key("with space"));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");

        let store = FileStore::new(dir.path()).expect("open store");
        store.set("favorites", r#"[{"idDrink":"1"}]"#.to_string()).await.expect("set");
        drop(store);

        let reopened = FileStore::new(dir.path()).expect("reopen store");
        let value = reopened.get("favorites").await.expect("get");
        assert_eq!(value.as_deref(), Some(r#"[{"idDrink":"1"}]"#));
        assert!(dir.path().join("favorites.json").exists());
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sets_on_one_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = std::sync::Arc::new(FileStore::new(dir.path()).expect("open store"));
        let mut errors = 0;

        for round in 0..50 {
            let handles: Vec<_> = (0..8)
                .map(|writer| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        store.set("favorites", format!("[{},{}]", round, writer)).await
                    })
                })
                .collect();
            for handle in handles {
                if handle.await.expect("join").is_err() {
                    errors += 1;
                }
            }
        }

        assert_eq!(errors, 0);
        let value = store.get("favorites").await.expect("get").expect("value");
        assert!(value.starts_with("[49,"));
        // Only the target file remains
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_and_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("nested")).expect("open store");

        assert_eq!(store.get("user_stats").await.ok(), Some(None));
        store.remove("user_stats").await.expect("removing a missing key succeeds");

        store.set("user_stats", "{}".to_string()).await.expect("set");
        store.set("user_stats", "{\"a\":1}".to_string()).await.expect("overwrite");
        assert_eq!(store.get("user_stats").await.ok(), Some(Some("{\"a\":1}".to_string())));

        store.remove_many(&["user_stats", "user_preferences"]).await.expect("remove_many");
        assert_eq!(store.get("user_stats").await.ok(), Some(None));
    }

    #[tokio::test]
    async fn test_invalid_key_is_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path()).expect("open store");
        let err = store.get("../etc/passwd").await.unwrap_err();
        assert!(err.is_storage());
    }
}
