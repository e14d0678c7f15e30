use std::sync::Arc;

use tracing::{debug, warn};

use super::codec;
use crate::error::{StoreError, StoreResult};
use crate::models::Cocktail;
use crate::store::{KeyValueStore, FAVORITES_KEY};

/// The user's favorited cocktails, kept in insertion order and unique by id.
///
/// Holds no in-memory copy: every call re-reads the store, and every
/// mutation rewrites the whole list under one key. Two mutations racing
/// each other are not serialized; the later write wins.
///
/// Reads fail open (an unreadable or corrupt list reads as empty), writes
/// fail closed.
#[derive(Clone)]
pub struct FavoritesRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current list for a read-modify-write. Store faults propagate; a
    /// corrupt list is discarded so it cannot block new writes.
    async fn load_for_update(&self) -> StoreResult<Vec<Cocktail>> {
        match codec::load(self.store.as_ref(), FAVORITES_KEY).await {
            Ok(favorites) => Ok(favorites.unwrap_or_default()),
            Err(e @ StoreError::Format { .. }) => {
                warn!(error = %e, "Discarding unreadable favorites list");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn persist(&self, favorites: &[Cocktail]) -> StoreResult<()> {
        codec::save(self.store.as_ref(), FAVORITES_KEY, favorites).await
    }

    /// Add a cocktail unless one with the same id is already saved.
    /// Returns whether the list changed.
    pub async fn add(&self, cocktail: &Cocktail) -> StoreResult<bool> {
        let mut favorites = self.load_for_update().await?;
        if favorites.iter().any(|f| f.id == cocktail.id) {
            debug!(id = %cocktail.id, "Already a favorite");
            return Ok(false);
        }
        favorites.push(cocktail.clone());
        self.persist(&favorites).await?;
        debug!(id = %cocktail.id, count = favorites.len(), "Added favorite");
        Ok(true)
    }

    /// Remove the cocktail with `id`. The list is re-persisted even when
    /// nothing matched. Returns whether an entry was removed.
    pub async fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut favorites = self.load_for_update().await?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        self.persist(&favorites).await?;
        let removed = favorites.len() != before;
        debug!(id = id, removed = removed, "Removed favorite");
        Ok(removed)
    }

    /// Flip the favorite state of `cocktail`, returning the new state.
    pub async fn toggle(&self, cocktail: &Cocktail) -> StoreResult<bool> {
        if self.contains(&cocktail.id).await {
            self.remove(&cocktail.id).await?;
            Ok(false)
        } else {
            self.add(cocktail).await?;
            Ok(true)
        }
    }

    /// All favorites in the order they were added. Never fails; problems
    /// reading the list are logged and yield an empty list.
    pub async fn list(&self) -> Vec<Cocktail> {
        match codec::load(self.store.as_ref(), FAVORITES_KEY).await {
            Ok(favorites) => favorites.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to load favorites");
                Vec::new()
            }
        }
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.list().await.iter().any(|f| f.id == id)
    }

    pub async fn count(&self) -> usize {
        self.list().await.len()
    }

    /// Drop the whole list.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.remove(FAVORITES_KEY).await
    }
}
