//! Cache-through resolution.

use crate::ResolverClient;
use std::sync::Arc;
use tracing::debug;
use tunelink_core::{Platform, ResolvedLinkSet, ResolvedLinkStore};

/// A resolver that consults a [`ResolvedLinkStore`] before the network
/// and populates it after a successful resolution.
///
/// The store write runs on a detached task: a caller that drops the
/// `resolve` future mid-flight cancels its own wait, but a resolution
/// that already completed still lands in the cache. There is no callback
/// into the caller, so nothing can notify a caller that has gone away.
pub struct CachedResolver {
    client: Arc<ResolverClient>,
    store: Arc<dyn ResolvedLinkStore>,
}

impl CachedResolver {
    pub fn new(client: Arc<ResolverClient>, store: Arc<dyn ResolvedLinkStore>) -> Self {
        Self { client, store }
    }

    /// Resolve through the cache.
    pub async fn resolve(
        &self,
        url: &str,
        preferred: Option<Platform>,
    ) -> Option<ResolvedLinkSet> {
        if let Some(hit) = self.store.get_links(url, preferred).await {
            debug!(url = %url, "resolve.cache_hit");
            return Some(hit);
        }
        let resolved = self.client.resolve(url).await?;

        let store = Arc::clone(&self.store);
        let url = url.to_string();
        let result = resolved.clone();
        tokio::spawn(async move {
            store.put_links(&url, preferred, &result).await;
        });

        Some(resolved)
    }
}
