//! Fighting Fantasy adventure sessions.
//!
//! Wraps the `ff-mechanics` rules engine in an [`Adventure`] that owns the
//! game state, snapshots it after every action, and repairs whatever it
//! finds on load. Also provides a small line-oriented command interpreter
//! so front ends stay thin.

pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod store;

pub use config::AdventureConfig;
pub use error::{AdventureError, AdventureResult};
pub use session::Adventure;
pub use store::{FileStore, MemoryStore, SaveStore};
