//! Share-token codec.
//!
//! A share token is the unpadded URL-safe base64 of
//! `"platform:contentType:id"`, distributed as
//! `https://<share-domain>/s/<token>`. Decoding is total: anything that
//! is not a well-formed token yields `None` so inbound deep links can
//! degrade gracefully instead of crashing the caller.

use crate::types::{CanonicalIdentifier, ContentType, Platform};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;

/// An opaque, phishing-resistant token embedding a canonical identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

impl ShareToken {
    /// Encode an identifier into a token. Deterministic and injective.
    pub fn encode(id: &CanonicalIdentifier) -> Self {
        let payload = format!(
            "{}:{}:{}",
            id.platform().as_key(),
            id.content_type().as_key(),
            id.id()
        );
        Self(URL_SAFE_NO_PAD.encode(payload.as_bytes()))
    }

    /// Decode a token back into an identifier.
    ///
    /// Returns `None` on malformed base64, non-UTF-8 payload, a field
    /// count other than three, an unknown platform or content type, or
    /// an empty id. Never panics.
    pub fn decode(token: &str) -> Option<CanonicalIdentifier> {
        // Tolerate tokens that arrive with padding re-attached.
        let bytes = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).ok()?;
        let payload = String::from_utf8(bytes).ok()?;
        let fields: Vec<&str> = payload.split(':').collect();
        if fields.len() != 3 {
            return None;
        }
        let platform = Platform::from_key(fields[0])?;
        let content_type = ContentType::from_key(fields[1])?;
        CanonicalIdentifier::new(platform, content_type, fields[2]).ok()
    }

    /// The token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the outbound share URL: `https://<domain>/s/<token>`.
pub fn share_url(domain: &str, id: &CanonicalIdentifier) -> String {
    format!("https://{domain}/s/{}", ShareToken::encode(id))
}

/// Extract and decode the token from an inbound share URL.
///
/// Fails closed: any URL that is not exactly `/s/<token>` on some host
/// yields `None`. The legacy percent-encoded format is deliberately not
/// guessed at.
pub fn parse_share_url(url: &str) -> Option<CanonicalIdentifier> {
    let parsed = url::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .collect();
    match segments.as_slice() {
        ["s", token] => ShareToken::decode(token),
        _ => None,
    }
}
