//! TuneLink Resolver
//!
//! HTTP client for the external cross-platform link resolution service,
//! plus bounded batch fan-out.
//!
//! # Architecture
//!
//! - **Failure as absence**: network and service failures collapse to
//!   `None` after the retry budget; only caller mistakes (batch size)
//!   are typed errors
//! - **Bounded retry**: 3 attempts, exponential backoff from 500ms,
//!   retrying only 429/5xx/transport failures
//! - **Cache seam**: `CachedResolver` and `BatchResolver` consult any
//!   `tunelink_core::ResolvedLinkStore` without depending on a concrete
//!   storage crate
//!
//! # Example
//!
//! ```rust,no_run
//! use tunelink_resolver::{ResolverClient, ResolverConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResolverClient::new(ResolverConfig::new("https://api.song.link/v1-alpha.1/links"))?;
//! if let Some(links) = client.resolve("https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp").await {
//!     println!("{} platforms", links.links_by_platform.len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod batch;
mod cached;
mod client;
mod types;

pub use batch::BatchResolver;
pub use cached::CachedResolver;
pub use client::{backoff_for_attempt, ResolverClient, MAX_BATCH_SIZE};
pub use types::{
    BatchApiError, BatchApiRequest, BatchApiResponse, PlatformLink, ResolveResponse,
    ResolvedEntity, ResolverConfig,
};
