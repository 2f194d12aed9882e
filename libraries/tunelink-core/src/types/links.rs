/// Resolved link result types shared by the resolver and storage crates
use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Equivalent links for one piece of content on every platform the
/// resolution service knows about, plus display metadata.
///
/// Built only by the resolution client from the API response; treated as
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLinkSet {
    /// The resolution service's unique id for the entity, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Content title, when the service reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Artist name, when the service reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Artwork thumbnail URL, when the service reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Platform → URL for every platform the service resolved.
    pub links_by_platform: HashMap<Platform, String>,
}

impl ResolvedLinkSet {
    /// The resolved URL for one platform, if the service found one.
    pub fn link_for(&self, platform: Platform) -> Option<&str> {
        self.links_by_platform.get(&platform).map(String::as_str)
    }
}

/// Aggregated outcome of a batch resolution.
///
/// `items` preserves the input order; a failed item is `None` and has a
/// matching message in `errors`. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Per-input results, in input order.
    pub items: Vec<Option<ResolvedLinkSet>>,
    /// Number of items that resolved.
    pub success_count: usize,
    /// Number of items that did not resolve.
    pub failed_count: usize,
    /// One message per failed item.
    pub errors: Vec<String>,
}
