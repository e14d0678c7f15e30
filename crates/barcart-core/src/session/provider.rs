use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::models::{PreferenceSelection, StatsUpdate, UserPreferences, UserStats};
use crate::repository::{FavoritesRepository, ProfileRepository};

/// Lifecycle of a `Session`. `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug, Default)]
struct Cache {
    preferences: Option<UserPreferences>,
    /// Set once preferences are written or cleared through the session.
    preferences_changed: bool,
    stats: UserStats,
    /// Bumped on every stats change so stale write-backs can be skipped.
    stats_generation: u64,
}

struct Shared {
    cache: RwLock<Cache>,
    state: watch::Sender<SessionState>,
    /// Generation of the stats snapshot most recently persisted.
    persisted_generation: tokio::sync::Mutex<u64>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

/// In-memory view of the user's preferences and stats for the front end.
///
/// Construct one per process and hand clones to whatever renders user
/// data; clones share the same cache. Reads never touch the store.
///
/// Writes differ by record:
/// - preferences are write-through: the cache changes, then the save is
///   awaited and its error returned (the cache change is kept either way)
/// - stats are write-back: the cache changes immediately and the save runs
///   in the background, failures are only logged
#[derive(Clone)]
pub struct Session {
    profile: ProfileRepository,
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(profile: ProfileRepository) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            profile,
            shared: Arc::new(Shared {
                cache: RwLock::new(Cache::default()),
                state,
                persisted_generation: tokio::sync::Mutex::new(0),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Cache> {
        self.shared
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Cache> {
        self.shared
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ===== Lifecycle =====

    /// Load preferences and stats into the cache, then mark the session
    /// ready. A failed load keeps that record's default and is logged.
    /// Only the first call does any work.
    ///
    /// Changes made through the session while loading win over the loaded
    /// record: if preferences were updated (or stats modified) before the
    /// load finished, the loaded value for that record is discarded.
    pub async fn initialize(&self) {
        let started = self.shared.state.send_if_modified(|state| {
            if *state == SessionState::Uninitialized {
                *state = SessionState::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            debug!("Session already initialized");
            return;
        }

        let (preferences, stats) =
            tokio::join!(self.profile.load_preferences(), self.profile.load_stats());

        {
            let mut cache = self.write_cache();
            match preferences {
                Ok(_) if cache.preferences_changed => {
                    debug!("Preferences changed while loading, keeping them")
                }
                Ok(preferences) => cache.preferences = preferences,
                Err(e) => warn!(error = %e, "Failed to load preferences, using none"),
            }
            match stats {
                Ok(_) if cache.stats_generation > 0 => {
                    debug!("Stats changed while loading, keeping them")
                }
                Ok(stats) => cache.stats = stats,
                Err(e) => warn!(error = %e, "Failed to load stats, using defaults"),
            }
        }

        self.shared.state.send_replace(SessionState::Ready);
        info!(onboarded = self.preferences().is_some(), "Session ready");
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// Watch lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Resolve once `initialize` has finished.
    pub async fn ready(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|state| *state == SessionState::Ready).await;
    }

    // ===== Reads =====

    pub fn preferences(&self) -> Option<UserPreferences> {
        self.read_cache().preferences
    }

    pub fn stats(&self) -> UserStats {
        self.read_cache().stats.clone()
    }

    /// No preferences yet: the front end should show onboarding.
    pub fn needs_onboarding(&self) -> bool {
        self.is_ready() && self.preferences().is_none()
    }

    // ===== Preferences (write-through) =====

    pub async fn update_preferences(&self, preferences: UserPreferences) -> StoreResult<()> {
        {
            let mut cache = self.write_cache();
            cache.preferences = Some(preferences);
            cache.preferences_changed = true;
        }
        if let Err(e) = self.profile.save_preferences(&preferences).await {
            warn!(error = %e, "Failed to save preferences");
            return Err(e);
        }
        Ok(())
    }

    /// Validate an onboarding selection, then save it like
    /// `update_preferences`. An invalid selection changes nothing.
    pub async fn update_preferences_from(
        &self,
        selection: &PreferenceSelection,
    ) -> StoreResult<UserPreferences> {
        let preferences = selection.validate()?;
        self.update_preferences(preferences).await?;
        Ok(preferences)
    }

    // ===== Stats (write-back) =====

    /// Merge `update` into the cached stats and persist in the background.
    /// Returns the merged stats. An empty update changes and saves nothing.
    pub fn update_stats(&self, update: StatsUpdate) -> UserStats {
        if update.is_empty() {
            return self.stats();
        }
        self.modify_stats(|stats| stats.merge(&update))
    }

    /// Count one more app session and refresh the last-active time.
    pub fn record_session(&self) -> UserStats {
        self.modify_stats(|stats| {
            stats.total_sessions = stats.total_sessions.saturating_add(1);
            stats.last_active = Utc::now();
        })
    }

    /// Count one more cocktail opened by the user.
    pub fn record_tried(&self) -> UserStats {
        self.modify_stats(|stats| stats.cocktails_tried = stats.cocktails_tried.saturating_add(1))
    }

    /// Re-derive the favorites counter from the favorites list.
    pub async fn sync_favorite_count(&self, favorites: &FavoritesRepository) -> UserStats {
        let count = u32::try_from(favorites.count().await).unwrap_or(u32::MAX);
        if self.read_cache().stats.total_favorites == count {
            return self.stats();
        }
        self.update_stats(StatsUpdate::total_favorites(count))
    }

    fn modify_stats(&self, f: impl FnOnce(&mut UserStats)) -> UserStats {
        let (snapshot, generation) = {
            let mut cache = self.write_cache();
            f(&mut cache.stats);
            cache.stats_generation += 1;
            (cache.stats.clone(), cache.stats_generation)
        };
        self.spawn_stats_save(snapshot.clone(), generation);
        snapshot
    }

    fn spawn_stats_save(&self, stats: UserStats, generation: u64) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime, stats update not persisted");
                return;
            }
        };

        let profile = self.profile.clone();
        let shared = self.shared.clone();
        let handle = runtime.spawn(async move {
            let mut persisted = shared.persisted_generation.lock().await;
            if *persisted > generation {
                debug!(generation = generation, "Skipping superseded stats save");
                return;
            }
            match profile.put_stats(&stats).await {
                Ok(()) => *persisted = generation,
                Err(e) => warn!(error = %e, "Failed to save stats"),
            }
        });

        let mut pending = self
            .shared
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for background stats saves started so far.
    pub async fn flush(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self
                .shared
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            pending.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Stats save task failed");
            }
        }
    }

    // ===== Reset =====

    /// Forget preferences and stats. The cache is reset before the store is
    /// touched, so it stays reset even if the delete fails.
    pub async fn clear(&self) -> StoreResult<()> {
        {
            let mut cache = self.write_cache();
            cache.preferences = None;
            cache.preferences_changed = true;
            cache.stats = UserStats::default();
            cache.stats_generation += 1;
        }
        // Saves already queued must not resurrect the old stats
        self.flush().await;
        if let Err(e) = self.profile.clear().await {
            warn!(error = %e, "Failed to clear user data");
            return Err(e);
        }
        info!("Cleared user data");
        Ok(())
    }
}
