//! Integration tests for the resolution client and batch resolver.
//!
//! These use a mock server to pin down the retry schedule and the
//! failure-as-absence contract without touching the real service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tunelink_core::{LinkError, Platform, ResolvedLinkSet, ResolvedLinkStore};
use tunelink_resolver::{BatchResolver, CachedResolver, ResolverClient, ResolverConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ResolverConfig {
    let mut config = ResolverConfig::new(format!("{}/v1-alpha.1/links", server.uri()));
    // Short backoff keeps the schedule observable without slow tests.
    config.initial_backoff = Duration::from_millis(100);
    config.timeout = Duration::from_secs(2);
    config
}

fn success_body(spotify_url: &str) -> serde_json::Value {
    serde_json::json!({
        "entityUniqueId": "SPOTIFY_SONG::abc",
        "entitiesByUniqueId": {
            "SPOTIFY_SONG::abc": {
                "title": "Mr. Brightside",
                "artistName": "The Killers",
                "thumbnailUrl": "https://img.example/cover.jpg"
            }
        },
        "linksByPlatform": {
            "spotify": { "url": spotify_url, "entityUniqueId": "SPOTIFY_SONG::abc" },
            "tidal": { "url": "https://tidal.com/browse/track/1" }
        }
    })
}

/// In-memory `ResolvedLinkStore` for observing cache traffic.
#[derive(Default)]
struct TestStore {
    entries: Mutex<HashMap<String, ResolvedLinkSet>>,
}

impl TestStore {
    fn key(url: &str, preferred: Option<Platform>) -> String {
        match preferred {
            Some(p) => format!("{url}|{p}"),
            None => format!("{url}|"),
        }
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl ResolvedLinkStore for TestStore {
    async fn get_links(
        &self,
        url: &str,
        preferred: Option<Platform>,
    ) -> Option<ResolvedLinkSet> {
        self.entries.lock().await.get(&Self::key(url, preferred)).cloned()
    }

    async fn put_links(&self, url: &str, preferred: Option<Platform>, result: &ResolvedLinkSet) {
        self.entries
            .lock()
            .await
            .insert(Self::key(url, preferred), result.clone());
    }
}

// =============================================================================
// Retry Schedule Tests
// =============================================================================

mod retry_schedule {
    use super::*;

    #[tokio::test]
    async fn rate_limited_twice_then_success_takes_three_attempts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body("https://open.spotify.com/track/abc")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let started = Instant::now();
        let result = client.resolve("https://open.spotify.com/track/abc").await;
        let elapsed = started.elapsed();

        let links = result.expect("third attempt should succeed");
        assert_eq!(links.title.as_deref(), Some("Mr. Brightside"));
        // Backoff schedule at 100ms initial: 0 + 100 + 200.
        assert!(elapsed >= Duration::from_millis(300), "backoff too short: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "backoff too long: {elapsed:?}");
    }

    #[tokio::test]
    async fn not_found_fails_immediately_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let result = client.resolve("https://open.spotify.com/track/gone").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn server_errors_exhaust_the_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let result = client.resolve("https://open.spotify.com/track/abc").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unparsable_body_is_fatal_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let result = client.resolve("https://open.spotify.com/track/abc").await;
        assert!(result.is_none());
    }
}

// =============================================================================
// Resolution Result Tests
// =============================================================================

mod resolution {
    use super::*;

    #[tokio::test]
    async fn passes_url_as_query_parameter_and_maps_response() {
        let server = MockServer::start().await;
        let original = "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp";

        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .and(query_param("url", original))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(original)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let links = client.resolve(original).await.expect("should resolve");

        assert_eq!(links.entity_id.as_deref(), Some("SPOTIFY_SONG::abc"));
        assert_eq!(links.artist.as_deref(), Some("The Killers"));
        assert_eq!(links.link_for(Platform::Spotify), Some(original));
        assert_eq!(
            links.link_for(Platform::Tidal),
            Some("https://tidal.com/browse/track/1")
        );
    }
}

// =============================================================================
// Cached Resolution Tests
// =============================================================================

mod cached {
    use super::*;

    #[tokio::test]
    async fn cache_hit_skips_the_network() {
        let server = MockServer::start().await;
        // Any request would violate this zero-call expectation.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let url = "https://open.spotify.com/track/abc";
        let store = Arc::new(TestStore::default());
        let cached: ResolvedLinkSet = serde_json::from_value(serde_json::json!({
            "linksByPlatform": { "spotify": url }
        }))
        .unwrap();
        store.put_links(url, None, &cached).await;

        let client = Arc::new(ResolverClient::new(test_config(&server)).unwrap());
        let resolver = CachedResolver::new(client, store);
        let result = resolver.resolve(url, None).await.expect("cache hit");
        assert_eq!(result.link_for(Platform::Spotify), Some(url));
    }

    #[tokio::test]
    async fn miss_resolves_and_populates_the_store() {
        let server = MockServer::start().await;
        let url = "https://open.spotify.com/track/abc";
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(url)))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(TestStore::default());
        let client = Arc::new(ResolverClient::new(test_config(&server)).unwrap());
        let resolver = CachedResolver::new(client, Arc::clone(&store) as _);

        let result = resolver.resolve(url, None).await;
        assert!(result.is_some());

        // The store write is detached; give it a moment to land.
        for _ in 0..50 {
            if store.len().await == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.get_links(url, None).await.is_some());
    }
}

// =============================================================================
// Batch Resolution Tests
// =============================================================================

mod batch {
    use super::*;

    #[tokio::test]
    async fn size_bounds_are_checked_before_any_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = Arc::new(ResolverClient::new(test_config(&server)).unwrap());
        let resolver = BatchResolver::new(client);

        let empty: Vec<String> = vec![];
        let result = resolver.resolve_batch(&empty, None).await;
        assert!(matches!(result, Err(LinkError::InvalidArgument(_))));

        let eleven: Vec<String> = (0..11)
            .map(|i| format!("https://open.spotify.com/track/t{i}"))
            .collect();
        let result = resolver.resolve_batch(&eleven, None).await;
        assert!(matches!(result, Err(LinkError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn partial_failure_preserves_order_and_counts() {
        let server = MockServer::start().await;
        let good = "https://open.spotify.com/track/good";
        let bad = "https://open.spotify.com/track/bad";

        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .and(query_param("url", good))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(good)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1-alpha.1/links"))
            .and(query_param("url", bad))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(ResolverClient::new(test_config(&server)).unwrap());
        let resolver = BatchResolver::new(client);
        let urls = vec![bad.to_string(), good.to_string()];
        let report = resolver.resolve_batch(&urls, None).await.unwrap();

        assert_eq!(report.items.len(), 2);
        assert!(report.items[0].is_none(), "failed item keeps its slot");
        assert!(report.items[1].is_some());
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains(bad));
    }

    #[tokio::test]
    async fn batch_consults_the_store_before_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let url = "https://open.spotify.com/track/abc";
        let store = Arc::new(TestStore::default());
        let cached: ResolvedLinkSet = serde_json::from_value(serde_json::json!({
            "linksByPlatform": { "spotify": url }
        }))
        .unwrap();
        store.put_links(url, Some(Platform::Tidal), &cached).await;

        let client = Arc::new(ResolverClient::new(test_config(&server)).unwrap());
        let resolver = BatchResolver::new(client).with_store(store);
        let urls = vec![url.to_string()];
        let report = resolver
            .resolve_batch(&urls, Some(Platform::Tidal))
            .await
            .unwrap();
        assert_eq!(report.success_count, 1);
    }
}

// =============================================================================
// Remote Batch Endpoint Tests
// =============================================================================

mod remote_batch {
    use super::*;

    #[tokio::test]
    async fn posts_urls_and_parses_counts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1-alpha.1/links/api/v1/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tracks": [success_body("https://open.spotify.com/track/abc")],
                "errors": [{ "error": "unsupported url" }],
                "success_count": 1,
                "failed_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let urls = vec![
            "https://open.spotify.com/track/abc".to_string(),
            "https://example.com/nope".to_string(),
        ];
        let response = client
            .resolve_remote_batch(&urls)
            .await
            .unwrap()
            .expect("batch should succeed");
        assert_eq!(response.success_count, 1);
        assert_eq!(response.failed_count, 1);
        assert_eq!(response.tracks.len(), 1);
        assert_eq!(response.errors[0].error, "unsupported url");
    }

    #[tokio::test]
    async fn remote_batch_enforces_bounds_without_traffic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ResolverClient::new(test_config(&server)).unwrap();
        let result = client.resolve_remote_batch(&[]).await;
        assert!(matches!(result, Err(LinkError::InvalidArgument(_))));
    }
}
