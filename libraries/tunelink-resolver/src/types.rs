//! Resolver configuration and wire types for the resolution service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tunelink_core::{Platform, ResolvedLinkSet};

/// Configuration for [`crate::ResolverClient`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Resolution endpoint, queried as `GET <endpoint>?url=<url>`.
    pub endpoint: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Total attempts per `resolve` call, including the first.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles per further attempt.
    pub initial_backoff: Duration,
}

impl ResolverConfig {
    /// Defaults: 10s timeout, 3 attempts, 500ms initial backoff.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Raw resolution API response.
///
/// `linksByPlatform` keys the service emits for platforms we do not
/// model are skipped during conversion, not treated as errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    #[serde(default)]
    pub entity_unique_id: Option<String>,
    #[serde(default)]
    pub entities_by_unique_id: HashMap<String, ResolvedEntity>,
    #[serde(default)]
    pub links_by_platform: HashMap<String, PlatformLink>,
}

/// Per-entity display metadata in the API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntity {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Per-platform link in the API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    pub url: String,
    #[serde(default)]
    pub entity_unique_id: Option<String>,
}

impl ResolveResponse {
    /// Convert the raw response into an immutable [`ResolvedLinkSet`].
    pub fn into_link_set(self) -> ResolvedLinkSet {
        let entity = self
            .entity_unique_id
            .as_deref()
            .and_then(|id| self.entities_by_unique_id.get(id));
        let (title, artist, thumbnail_url) = entity
            .map(|e| (e.title.clone(), e.artist_name.clone(), e.thumbnail_url.clone()))
            .unwrap_or_default();

        let links_by_platform = self
            .links_by_platform
            .iter()
            .filter_map(|(key, link)| {
                Platform::from_key(key).map(|p| (p, link.url.clone()))
            })
            .collect();

        ResolvedLinkSet {
            entity_id: self.entity_unique_id,
            title,
            artist,
            thumbnail_url,
            links_by_platform,
        }
    }
}

/// Request body for the remote batch endpoint (`POST <endpoint>/api/v1/batch`).
#[derive(Debug, Clone, Serialize)]
pub struct BatchApiRequest {
    pub urls: Vec<String>,
}

/// One error record in the remote batch response.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchApiError {
    pub error: String,
}

/// Response body of the remote batch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchApiResponse {
    #[serde(default)]
    pub tracks: Vec<ResolveResponse>,
    #[serde(default)]
    pub errors: Vec<BatchApiError>,
    pub success_count: usize,
    pub failed_count: usize,
}
