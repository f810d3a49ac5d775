//! SQLite-backed local fallback for the heuristics library.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod fallback;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use fallback::SqliteFallback;
pub use schema::SNAPSHOT_KEY;
