/// Domain types for TuneLink
mod identifier;
mod links;
mod platform;

pub use identifier::CanonicalIdentifier;
pub use links::{BatchResult, ResolvedLinkSet};
pub use platform::{host_matches, ContentType, Platform};
