//! TuneLink Core
//!
//! Platform-agnostic domain types, the canonical identifier codec, and
//! share-token handling for TuneLink.
//!
//! This crate has no I/O. It defines:
//! - **Domain Types**: `Platform`, `ContentType`, `CanonicalIdentifier`,
//!   `ResolvedLinkSet`, `BatchResult`
//! - **Codec**: `codec::parse` / `codec::reconstruct_url` between
//!   platform URLs and canonical identifiers
//! - **Share Tokens**: `ShareToken` and the `/s/<token>` wire format
//! - **Seams**: the `ResolvedLinkStore` trait implemented by the storage
//!   crate and consumed by the resolver
//! - **Error Handling**: unified `LinkError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunelink_core::{codec, ShareToken};
//!
//! let id = codec::parse("https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp")?;
//! let token = ShareToken::encode(&id);
//! assert_eq!(ShareToken::decode(token.as_str()), Some(id));
//! # Ok::<(), tunelink_core::LinkError>(())
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod share;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LinkError, Result};
pub use share::{parse_share_url, share_url, ShareToken};
pub use traits::ResolvedLinkStore;
pub use types::{
    host_matches, BatchResult, CanonicalIdentifier, ContentType, Platform, ResolvedLinkSet,
};
