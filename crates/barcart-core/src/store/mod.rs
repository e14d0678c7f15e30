//! Durable key-value storage for user data.
//!
//! Everything barcart keeps on the device goes through `KeyValueStore`:
//! string keys mapping to serialized JSON values, one whole record per key.
//! Atomicity is per key only; there are no multi-key transactions.
//!
//! - `FileStore`: one JSON file per key in the data directory
//! - `MemoryStore`: in-process map for tests and throwaway sessions

pub mod file;
pub mod memory;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::error::StoreResult;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the serialized `UserPreferences`
pub const PREFERENCES_KEY: &str = "user_preferences";

/// Key holding the serialized `UserStats`
pub const STATS_KEY: &str = "user_stats";

/// Key holding the serialized favorites list
pub const FAVORITES_KEY: &str = "favorites";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Delete several keys, stopping at the first failure.
    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
