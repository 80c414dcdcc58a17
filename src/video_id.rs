use crate::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const VIDEO_HOST: &str = "youtube.com";
const SHORT_HOSTS: [&str; 2] = ["youtu.be", "www.youtu.be"];
const WATCH_PATH: &str = "/watch";
const EMBED_PREFIX: &str = "/embed/";

/// Outcome of [`resolve`]: the canonical id, or the reason the input was rejected.
pub type ParseResult = Result<VideoId, Error>;

fn shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap())
}

/// A canonical video identifier: exactly 11 characters from `[A-Za-z0-9_-]`.
///
/// The only ways to obtain one are [`resolve`], [`VideoId::parse`] and
/// deserialization, all of which check the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Accepts `raw` only if it already has the canonical shape.
    pub fn parse(raw: &str) -> Option<Self> {
        shape().is_match(raw).then(|| VideoId(raw.to_owned()))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoId::parse(s).ok_or(Error::Invalid)
    }
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if shape().is_match(&s) {
            Ok(VideoId(s))
        } else {
            Err(Error::Invalid)
        }
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Turns user input into a [`VideoId`].
///
/// Accepts a bare id, `youtube.com/watch?v=<id>`, `youtu.be/<id>` and
/// `youtube.com/embed/<id>`, with or without a scheme. `raw` is expected to be
/// trimmed already. Never panics; anything unrecognized is [`Error::Invalid`].
pub fn resolve(raw: &str) -> ParseResult {
    if raw.is_empty() {
        return Err(Error::Empty);
    }

    if let Some(id) = VideoId::parse(raw) {
        return Ok(id);
    }

    let url = if has_scheme(raw) {
        url::Url::parse(raw)
    } else {
        url::Url::parse(&format!("https://{raw}"))
    };

    url.ok()
        .and_then(|url| from_url(&url))
        .ok_or(Error::Invalid)
}

fn from_url(url: &url::Url) -> Option<VideoId> {
    let host = url.host_str()?;
    let path = url.path();

    if host.contains(VIDEO_HOST) && path == WATCH_PATH {
        let watched = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .and_then(|(_, value)| VideoId::parse(&value));
        if watched.is_some() {
            return watched;
        }
    }

    if SHORT_HOSTS.contains(&host) {
        let short = path
            .strip_prefix('/')
            .and_then(first_segment)
            .and_then(VideoId::parse);
        if short.is_some() {
            return short;
        }
    }

    if host.contains(VIDEO_HOST) {
        return path
            .strip_prefix(EMBED_PREFIX)
            .and_then(first_segment)
            .and_then(VideoId::parse);
    }

    None
}

/// The text up to the next `/` or `?`, if any.
fn first_segment(path: &str) -> Option<&str> {
    path.split(['/', '?']).next().filter(|s| !s.is_empty())
}

/// `http:`/`https:` in any case (slashes optional), or `scheme://` with a scheme made
/// of a letter followed by letters, digits, `+`, `-` or `.`.
fn has_scheme(raw: &str) -> bool {
    let head: String = raw.chars().take(6).collect::<String>().to_ascii_lowercase();
    if head.starts_with("http:") || head.starts_with("https:") {
        return true;
    }

    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
