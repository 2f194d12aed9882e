//! Bounded batch resolution with partial-failure semantics.

use crate::client::MAX_BATCH_SIZE;
use crate::ResolverClient;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use tunelink_core::{
    BatchResult, LinkError, Platform, ResolvedLinkSet, ResolvedLinkStore, Result,
};

/// Fans a bounded list of URLs out to the resolution client, optionally
/// through a cache, and aggregates per-item outcomes into one report.
pub struct BatchResolver {
    client: Arc<ResolverClient>,
    store: Option<Arc<dyn ResolvedLinkStore>>,
}

impl BatchResolver {
    pub fn new(client: Arc<ResolverClient>) -> Self {
        Self {
            client,
            store: None,
        }
    }

    /// Route per-item lookups through a cache.
    pub fn with_store(mut self, store: Arc<dyn ResolvedLinkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolve 1-10 URLs. Items run concurrently and fail independently:
    /// a failed item becomes `None` in `items` plus one message in
    /// `errors`, and never aborts the rest.
    ///
    /// # Errors
    /// `LinkError::InvalidArgument` when the batch size is out of bounds,
    /// before any network call.
    pub async fn resolve_batch(
        &self,
        urls: &[String],
        preferred: Option<Platform>,
    ) -> Result<BatchResult> {
        if urls.is_empty() || urls.len() > MAX_BATCH_SIZE {
            return Err(LinkError::invalid_argument(format!(
                "batch size must be 1-{MAX_BATCH_SIZE}, got {}",
                urls.len()
            )));
        }

        let items = join_all(urls.iter().map(|url| self.resolve_one(url, preferred))).await;

        let mut result = BatchResult::default();
        for (url, item) in urls.iter().zip(items) {
            match item {
                Some(resolved) => {
                    result.success_count += 1;
                    result.items.push(Some(resolved));
                }
                None => {
                    warn!(url = %url, "batch.item_failed");
                    result.failed_count += 1;
                    result.errors.push(format!("failed to resolve {url}"));
                    result.items.push(None);
                }
            }
        }
        debug!(
            total = urls.len(),
            ok = result.success_count,
            failed = result.failed_count,
            "batch.done"
        );
        Ok(result)
    }

    async fn resolve_one(
        &self,
        url: &str,
        preferred: Option<Platform>,
    ) -> Option<ResolvedLinkSet> {
        if let Some(store) = &self.store {
            if let Some(hit) = store.get_links(url, preferred).await {
                return Some(hit);
            }
        }
        let resolved = self.client.resolve(url).await?;
        if let Some(store) = &self.store {
            let store = Arc::clone(store);
            let url = url.to_string();
            let result = resolved.clone();
            tokio::spawn(async move {
                store.put_links(&url, preferred, &result).await;
            });
        }
        Some(resolved)
    }
}
