//! Platform URL resolution.
//!
//! Maps an arbitrary third-party media URL to the platform hosting it, the
//! media identifier, and the canonical embeddable form of the URL. Resolution
//! is total: anything unparsable resolves to [`Platform::Unknown`] rather
//! than guessing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The set of media platforms the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Vimeo,
    Instagram,
    Tiktok,
    Twitter,
    Art19,
    Acast,
    Buzzsprout,
    Amazon,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Vimeo => "vimeo",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Art19 => "art19",
            Platform::Acast => "acast",
            Platform::Buzzsprout => "buzzsprout",
            Platform::Amazon => "amazon",
            Platform::Unknown => "unknown",
        }
    }
}

/// The result of resolving a media URL. Derived entirely from the URL; no
/// external state is consulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedResolution {
    pub platform: Platform,
    pub media_id: Option<String>,
    pub canonical_url: Option<String>,
}

impl EmbedResolution {
    fn unknown() -> Self {
        EmbedResolution {
            platform: Platform::Unknown,
            media_id: None,
            canonical_url: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.platform != Platform::Unknown
    }
}

static URL_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://([^/?#]+)([^?#]*)(?:\?([^#]*))?").unwrap());

/// The pieces of a URL the extraction rules operate on.
struct UrlParts<'a> {
    host: String,
    segments: Vec<&'a str>,
    query: &'a str,
}

fn split_url(url: &str) -> Option<UrlParts<'_>> {
    let caps = URL_PARTS.captures(url.trim())?;
    let raw_host = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let host = raw_host
        .to_ascii_lowercase()
        .trim_start_matches("www.")
        .to_string();
    let path = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let query = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    Some(UrlParts {
        host,
        segments: path.split('/').filter(|s| !s.is_empty()).collect(),
        query,
    })
}

fn host_matches(host: &str, base: &str) -> bool {
    host == base || host.ends_with(&format!(".{base}"))
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name).then_some(v)
    })
}

/// The path segment immediately following `marker`, if any.
fn segment_after<'a>(segments: &[&'a str], marker: &str) -> Option<&'a str> {
    segments
        .iter()
        .position(|s| *s == marker)
        .and_then(|i| segments.get(i + 1))
        .copied()
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a raw media URL into platform, media id, and canonical URL.
///
/// Hosts are matched case-insensitively with any `www.` prefix ignored, in a
/// fixed table order; the first matching host wins. A URL whose host matches
/// no platform, or whose path yields no identifier, resolves to `Unknown`.
pub fn resolve(url: &str) -> EmbedResolution {
    let Some(parts) = split_url(url) else {
        return EmbedResolution::unknown();
    };

    let resolution = resolve_youtube(&parts)
        .or_else(|| resolve_vimeo(&parts))
        .or_else(|| resolve_instagram(&parts))
        .or_else(|| resolve_tiktok(url, &parts))
        .or_else(|| resolve_twitter(&parts))
        .or_else(|| resolve_art19(url, &parts))
        .or_else(|| resolve_acast(url, &parts))
        .or_else(|| resolve_buzzsprout(&parts))
        .or_else(|| resolve_amazon(url, &parts));

    match resolution {
        Some(r) => {
            log::debug!("resolved {} as {} ({:?})", url, r.platform.as_str(), r.media_id);
            r
        }
        None => EmbedResolution::unknown(),
    }
}

fn resolve_youtube(parts: &UrlParts) -> Option<EmbedResolution> {
    let id = if parts.host == "youtu.be" {
        parts.segments.first().copied()
    } else if host_matches(&parts.host, "youtube.com")
        || host_matches(&parts.host, "youtube-nocookie.com")
    {
        query_param(parts.query, "v").or_else(|| segment_after(&parts.segments, "embed"))
    } else {
        return None;
    };
    // Host matched but no id found: fall through to Unknown, not a guess.
    let id = id.filter(|s| !s.is_empty())?;
    Some(EmbedResolution {
        platform: Platform::Youtube,
        media_id: Some(id.to_string()),
        canonical_url: Some(format!("https://www.youtube.com/embed/{id}")),
    })
}

fn resolve_vimeo(parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "vimeo.com") {
        return None;
    }
    let id = segment_after(&parts.segments, "video")
        .filter(|s| all_digits(s))
        .or_else(|| {
            parts
                .segments
                .iter()
                .rev()
                .find(|s| all_digits(s))
                .copied()
        })?;
    Some(EmbedResolution {
        platform: Platform::Vimeo,
        media_id: Some(id.to_string()),
        canonical_url: Some(format!("https://player.vimeo.com/video/{id}")),
    })
}

fn resolve_instagram(parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "instagram.com") {
        return None;
    }
    let id = segment_after(&parts.segments, "p").or_else(|| segment_after(&parts.segments, "reel"))?;
    Some(EmbedResolution {
        platform: Platform::Instagram,
        media_id: Some(id.to_string()),
        canonical_url: Some(format!("https://www.instagram.com/p/{id}/embed")),
    })
}

fn resolve_tiktok(url: &str, parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "tiktok.com") {
        return None;
    }
    let id =
        segment_after(&parts.segments, "video").or_else(|| segment_after(&parts.segments, "t"))?;
    // The host serves embeds only for the exact original URL form.
    Some(EmbedResolution {
        platform: Platform::Tiktok,
        media_id: Some(id.to_string()),
        canonical_url: Some(url.trim().to_string()),
    })
}

fn resolve_twitter(parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "twitter.com") && !host_matches(&parts.host, "x.com") {
        return None;
    }
    let id = segment_after(&parts.segments, "status")?;
    // No canonical embed URL; the consumer renders through an embed script.
    Some(EmbedResolution {
        platform: Platform::Twitter,
        media_id: Some(id.to_string()),
        canonical_url: None,
    })
}

fn resolve_art19(url: &str, parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "art19.com") {
        return None;
    }
    let id = segment_after(&parts.segments, "episodes")?;
    let trimmed = url.trim().trim_end_matches('/');
    let canonical = if trimmed.ends_with("/embed") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/embed")
    };
    Some(EmbedResolution {
        platform: Platform::Art19,
        media_id: Some(id.to_string()),
        canonical_url: Some(canonical),
    })
}

fn resolve_acast(url: &str, parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "acast.com") || parts.segments.is_empty() {
        return None;
    }
    Some(EmbedResolution {
        platform: Platform::Acast,
        media_id: Some(parts.segments.join("/")),
        canonical_url: Some(url.trim().to_string()),
    })
}

fn resolve_buzzsprout(parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "buzzsprout.com") {
        return None;
    }
    let show = parts.segments.first().filter(|s| all_digits(s))?;
    let rest = match parts.segments.get(1) {
        Some(&"episodes") => parts.segments.get(2),
        other => other,
    }?;
    // The episode segment may carry a trailing slug ("12345-some-title").
    let episode: String = rest.bytes().take_while(u8::is_ascii_digit).map(char::from).collect();
    if episode.is_empty() {
        return None;
    }
    let size = buzzsprout_player_size(parts.query);
    Some(EmbedResolution {
        platform: Platform::Buzzsprout,
        media_id: Some(format!("{show}/{episode}")),
        canonical_url: Some(format!(
            "https://www.buzzsprout.com/{show}/{episode}?client_source={size}_player&iframe=true"
        )),
    })
}

/// Playback size for the buzzsprout canonical form. Carried over from either
/// the already-canonical `client_source` parameter or the legacy `player`
/// parameter so that resolving a canonical URL is idempotent.
fn buzzsprout_player_size(query: &str) -> String {
    if let Some(source) = query_param(query, "client_source")
        && let Some(size) = source.strip_suffix("_player")
        && !size.is_empty()
    {
        return size.to_string();
    }
    match query_param(query, "player") {
        Some(size) if !size.is_empty() => size.to_string(),
        _ => "small".to_string(),
    }
}

fn resolve_amazon(url: &str, parts: &UrlParts) -> Option<EmbedResolution> {
    if !host_matches(&parts.host, "amazon.com") && !host_matches(&parts.host, "amazon.co.uk") {
        return None;
    }
    // Only kindle reader links qualify.
    if !parts.segments.iter().any(|s| *s == "read") {
        return None;
    }
    let asin = query_param(parts.query, "asin")?;
    Some(EmbedResolution {
        platform: Platform::Amazon,
        media_id: Some(asin.to_string()),
        canonical_url: Some(url.trim().to_string()),
    })
}
