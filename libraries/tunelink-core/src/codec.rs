//! URL ⇄ canonical identifier codec.
//!
//! `parse` maps a heterogeneous platform URL to a [`CanonicalIdentifier`];
//! `reconstruct_url` is the deterministic reverse mapping. For every
//! identifier the codec itself can produce, `parse(&reconstruct_url(x))`
//! yields `x` again.

use crate::error::{LinkError, Result};
use crate::types::{host_matches, CanonicalIdentifier, ContentType, Platform};
use url::Url;

/// Parse a platform URL into a canonical identifier.
///
/// Platforms are tried in declaration order with exact-or-subdomain host
/// matching; the first platform claiming the host must also recognize the
/// path/query shape. Anything else fails with
/// [`LinkError::UnsupportedFormat`] - there is no fallback guessing.
pub fn parse(raw: &str) -> Result<CanonicalIdentifier> {
    let url =
        Url::parse(raw).map_err(|e| LinkError::unsupported(format!("not a URL: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LinkError::unsupported(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }
    let host = url
        .host_str()
        .ok_or_else(|| LinkError::unsupported("URL has no host"))?
        .to_ascii_lowercase();

    let platform = Platform::ALL
        .into_iter()
        .find(|p| p.claims_host(&host))
        .ok_or_else(|| LinkError::unsupported(format!("unknown host: {host}")))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let extracted = match platform {
        Platform::Spotify => parse_spotify(&segments),
        Platform::AppleMusic => parse_apple_music(&segments),
        Platform::Youtube | Platform::YoutubeMusic => {
            parse_youtube(platform, &host, &segments, &url)
        }
        Platform::Soundcloud => parse_soundcloud(&segments),
        Platform::Tidal => parse_tidal(&segments),
        Platform::Deezer => parse_deezer(&segments),
        Platform::AmazonMusic => parse_amazon_music(&host, &segments, &url),
    };

    let (content_type, id) = extracted.ok_or_else(|| {
        LinkError::unsupported(format!("unrecognized {platform} URL: {raw}"))
    })?;
    CanonicalIdentifier::new(platform, content_type, id)
}

/// Produce the canonical browsable URL for an identifier.
///
/// Only used on decode paths (inbound share tokens); stays consistent
/// with [`parse`] for every identifier the codec produces.
pub fn reconstruct_url(id: &CanonicalIdentifier) -> String {
    let content = id.content_type();
    let raw = id.id();
    match id.platform() {
        Platform::Spotify => {
            format!("https://open.spotify.com/{}/{raw}", content.as_key())
        }
        Platform::AppleMusic => {
            let kind = match content {
                ContentType::Track => "song",
                other => other.as_key(),
            };
            format!("https://music.apple.com/us/{kind}/{raw}")
        }
        Platform::Youtube => youtube_url("https://www.youtube.com", content, raw),
        Platform::YoutubeMusic => youtube_url("https://music.youtube.com", content, raw),
        Platform::Soundcloud => format!("https://soundcloud.com/{raw}"),
        Platform::Tidal => format!("https://tidal.com/browse/{}/{raw}", content.as_key()),
        Platform::Deezer => format!("https://www.deezer.com/{}/{raw}", content.as_key()),
        Platform::AmazonMusic => {
            let kind = match content {
                ContentType::Track => "tracks",
                ContentType::Album => "albums",
                ContentType::Artist => "artists",
                ContentType::Playlist => "playlists",
            };
            format!("https://music.amazon.com/{kind}/{raw}")
        }
    }
}

fn youtube_url(base: &str, content: ContentType, id: &str) -> String {
    match content {
        ContentType::Track => format!("{base}/watch?v={id}"),
        ContentType::Playlist | ContentType::Album => format!("{base}/playlist?list={id}"),
        ContentType::Artist => format!("{base}/channel/{id}"),
    }
}

fn content_from_path_kind(kind: &str) -> Option<ContentType> {
    match kind {
        "track" => Some(ContentType::Track),
        "album" => Some(ContentType::Album),
        "artist" => Some(ContentType::Artist),
        "playlist" => Some(ContentType::Playlist),
        _ => None,
    }
}

fn is_alphanumeric_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// open.spotify.com/{type}/{id}, tolerating the `intl-xx` locale segment
/// and `embed` prefix that share-intent URLs carry, plus trailing extras.
fn parse_spotify(segments: &[&str]) -> Option<(ContentType, String)> {
    let mut segments = segments;
    while let Some(first) = segments.first() {
        if first.starts_with("intl-") || *first == "embed" {
            segments = &segments[1..];
        } else {
            break;
        }
    }
    let kind = content_from_path_kind(segments.first().copied()?)?;
    let id = *segments.get(1)?;
    is_alphanumeric_id(id).then(|| (kind, id.to_string()))
}

/// music.apple.com/{storefront}/{song|album|artist|playlist}/[{slug}/]{id}
fn parse_apple_music(segments: &[&str]) -> Option<(ContentType, String)> {
    if segments.len() < 3 {
        return None;
    }
    let kind = match segments[1] {
        "song" => ContentType::Track,
        other => content_from_path_kind(other)?,
    };
    let id = *segments.last()?;
    (!id.is_empty()).then(|| (kind, id.to_string()))
}

/// watch?v= for tracks, playlist?list= for playlists, /channel/{id} for
/// artists; youtu.be short links carry the video id as the only segment.
fn parse_youtube(
    platform: Platform,
    host: &str,
    segments: &[&str],
    url: &Url,
) -> Option<(ContentType, String)> {
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };
    if platform == Platform::Youtube && host_matches(host, "youtu.be") {
        let id = *segments.first()?;
        return (!id.is_empty()).then(|| (ContentType::Track, id.to_string()));
    }
    match segments.first().copied() {
        Some("watch") => {
            let id = query("v")?;
            (!id.is_empty()).then_some((ContentType::Track, id))
        }
        Some("playlist") => {
            let id = query("list")?;
            (!id.is_empty()).then_some((ContentType::Playlist, id))
        }
        Some("channel") => {
            let id = *segments.get(1)?;
            (!id.is_empty()).then(|| (ContentType::Artist, id.to_string()))
        }
        _ => None,
    }
}

/// soundcloud.com/{user}, /{user}/{track} or /{user}/sets/{playlist}.
/// The composite path is the id; it reconstructs by simple prefixing.
fn parse_soundcloud(segments: &[&str]) -> Option<(ContentType, String)> {
    match segments {
        [user] => Some((ContentType::Artist, (*user).to_string())),
        [user, "sets", slug] => Some((ContentType::Playlist, format!("{user}/sets/{slug}"))),
        [user, track] if *track != "sets" => {
            Some((ContentType::Track, format!("{user}/{track}")))
        }
        _ => None,
    }
}

/// tidal.com/[browse/]{type}/{id}; numeric ids except playlists (UUIDs).
fn parse_tidal(segments: &[&str]) -> Option<(ContentType, String)> {
    let segments = match segments.first() {
        Some(&"browse") => &segments[1..],
        _ => segments,
    };
    let kind = content_from_path_kind(segments.first().copied()?)?;
    let id = *segments.get(1)?;
    let valid = match kind {
        ContentType::Playlist => !id.is_empty(),
        _ => is_numeric_id(id),
    };
    valid.then(|| (kind, id.to_string()))
}

/// deezer.com/[{lang}/]{type}/{id}; ids are purely numeric.
fn parse_deezer(segments: &[&str]) -> Option<(ContentType, String)> {
    let segments = match segments.first() {
        Some(&first) if first.len() == 2 && content_from_path_kind(first).is_none() => {
            &segments[1..]
        }
        _ => segments,
    };
    let kind = content_from_path_kind(segments.first().copied()?)?;
    let id = *segments.get(1)?;
    is_numeric_id(id).then(|| (kind, id.to_string()))
}

/// music.amazon.com/{albums|artists|playlists|tracks}/{id}. Music content
/// on the shared retail domains is accepted only under the `/music` path
/// prefix. An album URL with a `trackAsin` query names that track.
fn parse_amazon_music(
    host: &str,
    segments: &[&str],
    url: &Url,
) -> Option<(ContentType, String)> {
    let mut segments = if host.starts_with("music.") {
        segments
    } else {
        match segments.first() {
            Some(&"music") => &segments[1..],
            _ => return None,
        }
    };
    // Web-player URLs insert a "player" segment before the content path.
    if segments.first() == Some(&"player") {
        segments = &segments[1..];
    }
    let track_asin = url
        .query_pairs()
        .find(|(k, _)| k == "trackAsin")
        .map(|(_, v)| v.into_owned());
    match (segments.first().copied(), segments.get(1).copied()) {
        (Some("albums"), Some(id)) => match track_asin {
            Some(asin) => is_alphanumeric_id(&asin).then_some((ContentType::Track, asin)),
            None => is_alphanumeric_id(id).then(|| (ContentType::Album, id.to_string())),
        },
        (Some("artists"), Some(id)) if is_alphanumeric_id(id) => {
            Some((ContentType::Artist, id.to_string()))
        }
        (Some("playlists"), Some(id)) if is_alphanumeric_id(id) => {
            Some((ContentType::Playlist, id.to_string()))
        }
        (Some("tracks"), Some(id)) if is_alphanumeric_id(id) => {
            Some((ContentType::Track, id.to_string()))
        }
        _ => None,
    }
}
