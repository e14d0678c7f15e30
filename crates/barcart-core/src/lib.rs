//! barcart core library.
//!
//! Local persistence for a cocktail companion app: the user's favorites,
//! taste preferences and dashboard stats, kept in a key-value store and
//! mirrored in memory for the front end. Also ships a small client for
//! TheCocktailDB so front ends can fetch the recipes they store.
//!
//! ```no_run
//! use std::sync::Arc;
//! use barcart_core::{FavoritesRepository, FileStore, KeyValueStore, ProfileRepository, Session};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new("/tmp/barcart")?);
//! let favorites = FavoritesRepository::new(store.clone());
//! let session = Session::new(ProfileRepository::new(store));
//! session.initialize().await;
//! println!("{} favorites", favorites.count().await);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod session;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use models::{
    BaseLiquor, Cocktail, DrinkStrength, Ingredient, Mood, PreferenceSelection, StatsUpdate,
    Sweetness, UserPreferences, UserStats,
};
pub use repository::{FavoritesRepository, ProfileRepository};
pub use session::{Session, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore};
