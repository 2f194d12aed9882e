//! Share/receive history.
//!
//! Every outbound share and inbound token lands here so the host can
//! show a history screen. The entry kind is decided at construction
//! (a closed sum type, no runtime field probing), and re-recording the
//! same logical item inside a configurable look-back window is
//! suppressed to keep rapid repeat shares from flooding the list.

use crate::error::Result;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tunelink_core::CanonicalIdentifier;
use uuid::Uuid;

const NAMESPACE: &str = "history/";

/// History policy.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Look-back window inside which a duplicate of the same logical
    /// item is not recorded again.
    pub dedup_window: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dedup_window: Duration::from_secs(5 * 60),
        }
    }
}

/// One history item, tagged at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HistoryEntry {
    /// A link this user shared out.
    Shared {
        id: String,
        identifier: CanonicalIdentifier,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        at: DateTime<Utc>,
    },
    /// A share token this user opened.
    Received {
        id: String,
        original_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        at: DateTime<Utc>,
    },
}

impl HistoryEntry {
    /// A new outbound share record.
    pub fn shared(identifier: CanonicalIdentifier, title: Option<String>) -> Self {
        Self::Shared {
            id: Uuid::new_v4().to_string(),
            identifier,
            title,
            at: Utc::now(),
        }
    }

    /// A new inbound receive record.
    pub fn received(original_url: impl Into<String>, title: Option<String>) -> Self {
        Self::Received {
            id: Uuid::new_v4().to_string(),
            original_url: original_url.into(),
            title,
            at: Utc::now(),
        }
    }

    /// Unique record id.
    pub fn id(&self) -> &str {
        match self {
            Self::Shared { id, .. } | Self::Received { id, .. } => id,
        }
    }

    /// When the record was created.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Self::Shared { at, .. } | Self::Received { at, .. } => *at,
        }
    }

    /// The key duplicates are detected by: the canonical identifier for
    /// shares, the original URL for receives.
    fn logical_key(&self) -> String {
        match self {
            Self::Shared { identifier, .. } => format!("shared:{identifier}"),
            Self::Received { original_url, .. } => format!("received:{original_url}"),
        }
    }
}

/// History store over the key/value substrate.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    config: HistoryConfig,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: HistoryConfig) -> Self {
        Self { store, config }
    }

    /// Record an entry unless the same logical item was recorded within
    /// the dedup window. Returns whether the entry was inserted.
    pub async fn record(&self, entry: HistoryEntry) -> Result<bool> {
        let window = chrono::Duration::from_std(self.config.dedup_window)
            .unwrap_or(chrono::Duration::MAX);
        let cutoff = entry.recorded_at() - window;
        let logical_key = entry.logical_key();

        for existing in self.load_all().await? {
            if existing.logical_key() == logical_key && existing.recorded_at() >= cutoff {
                debug!(key = %logical_key, "history.duplicate_suppressed");
                return Ok(false);
            }
        }

        let key = format!("{NAMESPACE}{}", entry.id());
        self.store.put(&key, &serde_json::to_string(&entry)?).await?;
        Ok(true)
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load_all().await?;
        entries.sort_by_key(|e| std::cmp::Reverse(e.recorded_at()));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Drop all history.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear(NAMESPACE).await
    }

    async fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        for (key, raw) in self.store.entries(NAMESPACE).await? {
            match serde_json::from_str::<HistoryEntry>(&raw) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // Same policy as the cache: unreadable data is
                    // dropped, not surfaced.
                    warn!(key = %key, error = %e, "history.entry_corrupted");
                    if let Err(e) = self.store.delete(&key).await {
                        warn!(key = %key, error = %e, "history.cleanup_failed");
                    }
                }
            }
        }
        Ok(entries)
    }
}
