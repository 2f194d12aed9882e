/// Platform and content type enums
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported streaming platform.
///
/// The serde representation matches the resolution API's
/// `linksByPlatform` keys (`spotify`, `appleMusic`, ...), so responses
/// and cached entries round-trip without a separate mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    Spotify,
    AppleMusic,
    // YoutubeMusic must be matched before Youtube: music.youtube.com is
    // a subdomain of youtube.com under suffix matching.
    YoutubeMusic,
    Youtube,
    Soundcloud,
    Tidal,
    Deezer,
    AmazonMusic,
}

impl Platform {
    /// All platforms, in host-matching order.
    pub const ALL: [Platform; 8] = [
        Platform::Spotify,
        Platform::AppleMusic,
        Platform::YoutubeMusic,
        Platform::Youtube,
        Platform::Soundcloud,
        Platform::Tidal,
        Platform::Deezer,
        Platform::AmazonMusic,
    ];

    /// The wire key used by the resolution API and the share token.
    pub fn as_key(self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "appleMusic",
            Platform::YoutubeMusic => "youtubeMusic",
            Platform::Youtube => "youtube",
            Platform::Soundcloud => "soundcloud",
            Platform::Tidal => "tidal",
            Platform::Deezer => "deezer",
            Platform::AmazonMusic => "amazonMusic",
        }
    }

    /// Parse a wire key back into a platform.
    pub fn from_key(key: &str) -> Option<Self> {
        Platform::ALL.into_iter().find(|p| p.as_key() == key)
    }

    /// Hostnames accepted for this platform.
    ///
    /// Matching is exact-or-subdomain (see [`host_matches`]). Amazon
    /// retail domains are listed here but carry an additional path
    /// restriction handled by the parser: only paths under `/music`
    /// are music content.
    pub fn domains(self) -> &'static [&'static str] {
        match self {
            Platform::Spotify => &["open.spotify.com", "spotify.com", "spotify.link"],
            Platform::AppleMusic => &["music.apple.com"],
            Platform::YoutubeMusic => &["music.youtube.com"],
            Platform::Youtube => &["youtube.com", "youtu.be"],
            Platform::Soundcloud => &["soundcloud.com"],
            Platform::Tidal => &["tidal.com"],
            Platform::Deezer => &["deezer.com", "deezer.page.link"],
            Platform::AmazonMusic => &[
                "music.amazon.com",
                "amazon.com",
                "amazon.co.uk",
                "amazon.de",
                "amazon.co.jp",
            ],
        }
    }

    /// Whether this platform claims the given hostname.
    pub fn claims_host(self, host: &str) -> bool {
        self.domains().iter().any(|d| host_matches(host, d))
    }

    /// Content types this platform can address with a canonical URL.
    pub fn supports(self, content_type: ContentType) -> bool {
        match self {
            Platform::Youtube | Platform::YoutubeMusic => {
                // Albums on YouTube surfaces are playlists; there is no
                // distinct album URL shape to reconstruct.
                content_type != ContentType::Album
            }
            Platform::Soundcloud => content_type != ContentType::Album,
            _ => true,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// The kind of content a canonical identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl ContentType {
    /// All content types.
    pub const ALL: [ContentType; 4] = [
        ContentType::Track,
        ContentType::Album,
        ContentType::Artist,
        ContentType::Playlist,
    ];

    /// The wire key used in share tokens.
    pub fn as_key(self) -> &'static str {
        match self {
            ContentType::Track => "track",
            ContentType::Album => "album",
            ContentType::Artist => "artist",
            ContentType::Playlist => "playlist",
        }
    }

    /// Parse a wire key back into a content type.
    pub fn from_key(key: &str) -> Option<Self> {
        ContentType::ALL.into_iter().find(|c| c.as_key() == key)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// Exact-or-subdomain host matching.
///
/// `open.spotify.com` matches the domain `spotify.com`; `notspotify.com`
/// does not.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}
