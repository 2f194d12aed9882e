//! Bounded, TTL-expiring cache of resolved link sets.
//!
//! Entries live in a namespaced region of the host-supplied
//! [`KeyValueStore`]. Expiry is lazy on read with an explicit
//! `clear_expired` sweep for periodic compaction; the size bound evicts
//! the oldest entries by insertion time (recency of insert, not of
//! access). A corrupted entry is a miss, never an error: the worst a
//! broken cache can cost is a redundant network call.

use crate::error::Result;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tunelink_core::{Platform, ResolvedLinkSet, ResolvedLinkStore};

const NAMESPACE: &str = "links/";

/// Per-instance cache policy.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Age beyond which an entry is logically absent.
    pub max_age: Duration,
    /// Entry cap; exceeding it evicts the oldest entries.
    pub max_entries: usize,
}

impl CacheConfig {
    /// Max age used for full link caching.
    pub const LINK_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    /// Max age used for metadata-only call sites.
    pub const METADATA_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age: Self::LINK_MAX_AGE,
            max_entries: 50,
        }
    }
}

/// Derive the cache key for `(url, preferred platform)`.
///
/// The single derivation point: every call site goes through here, so
/// key formats cannot drift apart.
pub fn cache_key(url: &str, preferred: Option<Platform>) -> String {
    match preferred {
        Some(platform) => format!("{url}::{platform}"),
        None => url.to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    result: ResolvedLinkSet,
    cached_at: DateTime<Utc>,
}

/// TTL + size bounded cache of [`ResolvedLinkSet`]s.
pub struct LinkCache {
    store: Arc<dyn KeyValueStore>,
    config: CacheConfig,
}

impl LinkCache {
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Look up a cached result.
    ///
    /// Expired entries are evicted and reported as misses; unreadable
    /// entries (substrate errors, undeserializable payloads) are
    /// likewise misses and never propagate.
    pub async fn get(&self, url: &str, preferred: Option<Platform>) -> Option<ResolvedLinkSet> {
        let key = self.full_key(url, preferred);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "cache.read_failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, "cache.entry_corrupted");
                self.delete_quietly(&key).await;
                return None;
            }
        };

        if self.is_expired(entry.cached_at) {
            debug!(key = %key, "cache.entry_expired");
            self.delete_quietly(&key).await;
            return None;
        }
        Some(entry.result)
    }

    /// Write or overwrite an entry, then enforce the size bound by
    /// evicting the oldest entries by `cached_at`.
    pub async fn put(
        &self,
        url: &str,
        preferred: Option<Platform>,
        result: &ResolvedLinkSet,
    ) -> Result<()> {
        let entry = CacheEntry {
            result: result.clone(),
            cached_at: Utc::now(),
        };
        let key = self.full_key(url, preferred);
        self.store.put(&key, &serde_json::to_string(&entry)?).await?;
        self.enforce_cap().await
    }

    /// Remove one entry.
    pub async fn invalidate(&self, url: &str, preferred: Option<Platform>) -> Result<()> {
        self.store.delete(&self.full_key(url, preferred)).await
    }

    /// Maintenance sweep: drop every expired or unreadable entry.
    ///
    /// Independent of the lazy per-read expiry; useful for periodic
    /// compaction.
    pub async fn clear_expired(&self) -> Result<()> {
        for (key, raw) in self.store.entries(NAMESPACE).await? {
            match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) if !self.is_expired(entry.cached_at) => {}
                Ok(_) => self.store.delete(&key).await?,
                Err(e) => {
                    warn!(key = %key, error = %e, "cache.sweeping_corrupted_entry");
                    self.store.delete(&key).await?;
                }
            }
        }
        Ok(())
    }

    /// Drop the whole cache namespace.
    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear(NAMESPACE).await
    }

    fn full_key(&self, url: &str, preferred: Option<Platform>) -> String {
        format!("{NAMESPACE}{}", cache_key(url, preferred))
    }

    fn is_expired(&self, cached_at: DateTime<Utc>) -> bool {
        let max_age =
            chrono::Duration::from_std(self.config.max_age).unwrap_or(chrono::Duration::MAX);
        Utc::now() - cached_at > max_age
    }

    async fn delete_quietly(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!(key = %key, error = %e, "cache.evict_failed");
        }
    }

    async fn enforce_cap(&self) -> Result<()> {
        let entries = self.store.entries(NAMESPACE).await?;
        if entries.len() <= self.config.max_entries {
            return Ok(());
        }

        // Unreadable entries sort first so they are evicted before
        // anything with a valid timestamp.
        let mut by_age: Vec<(String, Option<DateTime<Utc>>)> = entries
            .into_iter()
            .map(|(key, raw)| {
                let cached_at = serde_json::from_str::<CacheEntry>(&raw)
                    .ok()
                    .map(|e| e.cached_at);
                (key, cached_at)
            })
            .collect();
        by_age.sort_by_key(|(_, cached_at)| *cached_at);

        let excess = by_age.len() - self.config.max_entries;
        for (key, _) in by_age.into_iter().take(excess) {
            debug!(key = %key, "cache.evicting_oldest");
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ResolvedLinkStore for LinkCache {
    async fn get_links(
        &self,
        url: &str,
        preferred: Option<Platform>,
    ) -> Option<ResolvedLinkSet> {
        self.get(url, preferred).await
    }

    async fn put_links(&self, url: &str, preferred: Option<Platform>, result: &ResolvedLinkSet) {
        if let Err(e) = self.put(url, preferred, result).await {
            warn!(url = %url, error = %e, "cache.write_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_derivation_is_stable_and_distinguishes_preference() {
        let url = "https://open.spotify.com/track/abc";
        assert_eq!(cache_key(url, None), url);
        assert_eq!(
            cache_key(url, Some(Platform::Tidal)),
            format!("{url}::tidal")
        );
        assert_ne!(
            cache_key(url, Some(Platform::Tidal)),
            cache_key(url, Some(Platform::Deezer))
        );
    }
}
