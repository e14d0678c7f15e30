//! HTTP client for TheCocktailDB.
//!
//! The public v1 API needs no authentication. Every drink endpoint wraps
//! its results in a `drinks` array (`null` when nothing matched); the
//! ingredient list uses `drinks` too, with one `strIngredient1` per entry.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
