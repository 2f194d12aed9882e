//! TuneLink Storage
//!
//! Persistent caching and history for TuneLink, over a host-supplied
//! key/value substrate.
//!
//! # Architecture
//!
//! - **Substrate seam**: `KeyValueStore` is the only thing the host must
//!   provide; `SqliteStore` (durable) and `MemoryStore` (ephemeral) ship
//!   in-crate
//! - **Bounded cache**: `LinkCache` expires entries lazily by TTL and
//!   evicts the oldest by insertion time past a configurable cap
//! - **Failure as miss**: corrupted or unreadable persisted data costs a
//!   redundant network call, never a failed resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunelink_storage::{CacheConfig, LinkCache, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::new("sqlite://tunelink.db").await?);
//! let cache = LinkCache::new(store, CacheConfig::default());
//! if let Some(links) = cache.get("https://open.spotify.com/track/abc", None).await {
//!     println!("{} platforms cached", links.links_by_platform.len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod cache;
mod error;
mod history;
mod sqlite;
mod store;

pub use cache::{cache_key, CacheConfig, LinkCache};
pub use error::{Result, StorageError};
pub use history::{HistoryConfig, HistoryEntry, HistoryStore};
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
