//! Resolution client with bounded retry.
//!
//! Network and service failures never surface as errors: after the retry
//! budget is spent (or immediately, for non-retryable failures) the call
//! returns `None` and the calling layer treats absence as the failure
//! signal. Details go to the log, not the caller.

use crate::types::{BatchApiRequest, BatchApiResponse, ResolveResponse, ResolverConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use tunelink_core::{LinkError, ResolvedLinkSet, Result};

/// Batch size bounds for the remote batch endpoint.
pub const MAX_BATCH_SIZE: usize = 10;

enum Attempt<T> {
    Success(T),
    Retry,
    Fatal,
}

/// Client for the external cross-platform resolution service.
pub struct ResolverClient {
    http: Client,
    config: ResolverConfig,
}

impl ResolverClient {
    /// Create a client. The endpoint must be a non-empty http(s) URL.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(LinkError::invalid_argument("endpoint cannot be empty"));
        }
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://")
        {
            return Err(LinkError::invalid_argument(
                "endpoint must start with http:// or https://",
            ));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LinkError::network(format!("build client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Resolve one URL into its equivalent links on every platform.
    ///
    /// Retry policy: up to `max_attempts` total attempts, the first
    /// immediate. 429, 5xx, and transport failures back off
    /// exponentially from `initial_backoff`; any other 4xx and response
    /// bodies that fail to parse give up at once.
    pub async fn resolve(&self, url: &str) -> Option<ResolvedLinkSet> {
        let endpoint = self.config.endpoint.clone();
        let response: Option<ResolveResponse> = self
            .fetch_json(url, move |http| {
                http.get(&endpoint).query(&[("url", url)])
            })
            .await;
        response.map(ResolveResponse::into_link_set)
    }

    /// Call the remote batch endpoint (`POST <endpoint>/api/v1/batch`).
    ///
    /// Size bounds are enforced before any network traffic; network
    /// failures collapse to `Ok(None)` like single resolution.
    pub async fn resolve_remote_batch(
        &self,
        urls: &[String],
    ) -> Result<Option<BatchApiResponse>> {
        if urls.is_empty() || urls.len() > MAX_BATCH_SIZE {
            return Err(LinkError::invalid_argument(format!(
                "batch size must be 1-{MAX_BATCH_SIZE}, got {}",
                urls.len()
            )));
        }
        let endpoint = format!(
            "{}/api/v1/batch",
            self.config.endpoint.trim_end_matches('/')
        );
        let body = BatchApiRequest {
            urls: urls.to_vec(),
        };
        Ok(self
            .fetch_json("batch", move |http| http.post(&endpoint).json(&body))
            .await)
    }

    /// Run one request with the retry/backoff schedule, decoding the
    /// success body as JSON. Attempts are strictly sequential.
    async fn fetch_json<T, F>(&self, context: &str, make_request: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> reqwest::RequestBuilder,
    {
        let mut delay = self.config.initial_backoff;
        for attempt in 1..=self.config.max_attempts.max(1) {
            if attempt > 1 {
                sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            match self.attempt_once(context, &make_request, attempt).await {
                Attempt::Success(value) => return Some(value),
                Attempt::Fatal => return None,
                Attempt::Retry => {}
            }
        }
        warn!(
            context = %context,
            attempts = self.config.max_attempts,
            "resolve.budget_exhausted"
        );
        None
    }

    async fn attempt_once<T, F>(&self, context: &str, make_request: &F, attempt: u32) -> Attempt<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> reqwest::RequestBuilder,
    {
        let response = match make_request(&self.http).send().await {
            Ok(response) => response,
            Err(e) => {
                // Timeouts and connection errors retry on the same
                // schedule as 5xx.
                warn!(context = %context, attempt, error = %e, "resolve.transport_error");
                return Attempt::Retry;
            }
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<T>().await {
                Ok(value) => {
                    debug!(context = %context, attempt, "resolve.ok");
                    Attempt::Success(value)
                }
                Err(e) => {
                    warn!(context = %context, attempt, error = %e, "resolve.parse_failed");
                    Attempt::Fatal
                }
            }
        } else if status.as_u16() == 429 || status.is_server_error() {
            warn!(context = %context, attempt, status = %status, "resolve.retryable_status");
            Attempt::Retry
        } else {
            warn!(context = %context, attempt, status = %status, "resolve.rejected");
            Attempt::Fatal
        }
    }
}

/// Exposed for callers that want to align their own pacing with the
/// client's backoff schedule.
pub fn backoff_for_attempt(initial: Duration, attempt: u32) -> Duration {
    if attempt <= 1 {
        Duration::ZERO
    } else {
        initial.saturating_mul(1u32 << (attempt - 2).min(16))
    }
}
