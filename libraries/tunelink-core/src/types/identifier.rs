/// Canonical identifier for a piece of music content
use crate::error::{LinkError, Result};
use crate::types::{ContentType, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The normalized `(platform, content type, id)` triple that uniquely
/// names a piece of music content independent of URL formatting.
///
/// Constructed only through [`CanonicalIdentifier::new`] or by the codec
/// (`parse`, `ShareToken::decode`), so an instance always carries a
/// non-empty, platform-supported identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
    platform: Platform,
    content_type: ContentType,
    id: String,
}

impl CanonicalIdentifier {
    /// Create a checked identifier.
    ///
    /// Rejects empty or whitespace-only ids, ids containing `:` (the
    /// share-token field separator), and content types the platform has
    /// no canonical URL shape for.
    pub fn new(
        platform: Platform,
        content_type: ContentType,
        id: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LinkError::invalid_argument("content id cannot be empty"));
        }
        if id.contains(':') {
            return Err(LinkError::invalid_argument(
                "content id cannot contain ':'",
            ));
        }
        if !platform.supports(content_type) {
            return Err(LinkError::invalid_argument(format!(
                "{platform} has no canonical {content_type} URL"
            )));
        }
        Ok(Self {
            platform,
            content_type,
            id,
        })
    }

    /// The platform this identifier belongs to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The content type this identifier names.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// The platform-specific content id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.platform, self.content_type, self.id)
    }
}
