/// Core traits for TuneLink
use crate::types::{Platform, ResolvedLinkSet};
use async_trait::async_trait;

/// A store of previously resolved link sets, keyed by original URL and
/// optional preferred platform.
///
/// Implemented by `tunelink-storage`'s cache; consumed by the resolver so
/// the two crates stay decoupled. Failures inside an implementation must
/// collapse to a miss (`None`) or a dropped write - a broken cache must
/// never fail a resolution.
#[async_trait]
pub trait ResolvedLinkStore: Send + Sync {
    /// Look up a cached result. Expired or unreadable entries are misses.
    async fn get_links(&self, url: &str, preferred: Option<Platform>)
        -> Option<ResolvedLinkSet>;

    /// Store a resolved result. Errors are absorbed by the implementation.
    async fn put_links(&self, url: &str, preferred: Option<Platform>, result: &ResolvedLinkSet);
}
