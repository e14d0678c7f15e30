//! Session state shared with the front end.
//!
//! `Session` caches the user's preferences and stats in memory, loads them
//! once at start-up and keeps the store in step after every change.

pub mod provider;

pub use provider::{Session, SessionState};
