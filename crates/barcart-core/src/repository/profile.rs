use std::sync::Arc;

use tracing::debug;

use super::codec;
use crate::error::StoreResult;
use crate::models::{PreferenceSelection, StatsUpdate, UserPreferences, UserStats};
use crate::store::{KeyValueStore, PREFERENCES_KEY, STATS_KEY};

/// Persistence for the two single-valued user records: preferences and
/// dashboard stats. Each lives under its own key and is loaded and saved
/// independently.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ===== Preferences =====

    /// `None` until onboarding has been completed.
    pub async fn load_preferences(&self) -> StoreResult<Option<UserPreferences>> {
        codec::load(self.store.as_ref(), PREFERENCES_KEY).await
    }

    pub async fn save_preferences(&self, prefs: &UserPreferences) -> StoreResult<()> {
        codec::save(self.store.as_ref(), PREFERENCES_KEY, prefs).await?;
        debug!(?prefs, "Saved preferences");
        Ok(())
    }

    /// Validate an onboarding selection and persist it. Nothing is written
    /// if any field is not a recognized option.
    pub async fn save_selection(&self, selection: &PreferenceSelection) -> StoreResult<UserPreferences> {
        let prefs = selection.validate()?;
        self.save_preferences(&prefs).await?;
        Ok(prefs)
    }

    // ===== Stats =====

    /// Stored stats, or defaults stamped with the current time.
    pub async fn load_stats(&self) -> StoreResult<UserStats> {
        let stats: Option<UserStats> = codec::load(self.store.as_ref(), STATS_KEY).await?;
        Ok(stats.unwrap_or_default())
    }

    /// Merge `update` onto the stored (or default) stats and persist the
    /// result.
    pub async fn save_stats(&self, update: &StatsUpdate) -> StoreResult<UserStats> {
        let stats = self.load_stats().await?.merged(update);
        self.put_stats(&stats).await?;
        Ok(stats)
    }

    /// Replace the stored stats outright.
    pub async fn put_stats(&self, stats: &UserStats) -> StoreResult<()> {
        codec::save(self.store.as_ref(), STATS_KEY, stats).await?;
        debug!(
            total_favorites = stats.total_favorites,
            cocktails_tried = stats.cocktails_tried,
            total_sessions = stats.total_sessions,
            "Saved stats"
        );
        Ok(())
    }

    /// Remove both records.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.remove_many(&[PREFERENCES_KEY, STATS_KEY]).await
    }
}
