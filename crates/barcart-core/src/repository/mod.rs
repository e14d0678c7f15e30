//! Repositories over the key-value store.
//!
//! - `FavoritesRepository`: the favorites list (`favorites` key)
//! - `ProfileRepository`: preferences and stats (`user_preferences`,
//!   `user_stats` keys)
//!
//! Each record is one JSON blob under one key and every write replaces the
//! whole blob.

mod codec;
pub mod favorites;
pub mod profile;

pub use favorites::FavoritesRepository;
pub use profile::ProfileRepository;
