//! Data models for barcart.
//!
//! - `Cocktail`, `Ingredient`: recipe records passed through from the API
//! - `UserPreferences`, `PreferenceSelection`: onboarding taste profile
//! - `UserStats`, `StatsUpdate`: dashboard counters and partial updates

pub mod cocktail;
pub mod preferences;
pub mod stats;

pub use cocktail::{Cocktail, Ingredient, MAX_INGREDIENTS};
pub use preferences::{
    BaseLiquor, DrinkStrength, Mood, PreferenceSelection, Sweetness, UserPreferences,
};
pub use stats::{StatsUpdate, UserStats, DEFAULT_FAVORITE_SPIRIT};
