//! Mount prefix matching.
//!
//! # Responsibilities
//! - Match a request path against a mount prefix, segment by segment
//! - Return the remaining raw path segments
//! - Percent-decode them one by one, rejecting invalid UTF-8
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `/api/nasa` matches `/api/nasa` and `/api/nasa/...`, never `/api/nasafoo`
//! - Segments are decoded individually, so `%2F` stays inside its segment

use std::borrow::Cow;

use crate::error::ProxyError;

/// A segment-aware path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPrefix {
    raw: String,
    segments: Vec<String>,
}

impl MountPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        let raw = prefix.into();
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of segments; longer prefixes are more specific.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Raw path remainder below this prefix, or `None` if it does not match.
    pub fn strip<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        if parts.len() < self.segments.len()
            || parts
                .iter()
                .zip(&self.segments)
                .any(|(actual, expected)| *actual != expected.as_str())
        {
            return None;
        }

        Some(parts[self.segments.len()..].to_vec())
    }
}

/// Percent-decode each raw segment on its own.
///
/// A segment whose escapes do not form valid UTF-8 is rejected, never
/// decoded lossily.
pub fn decode_segments(raw: &[&str]) -> Result<Vec<String>, ProxyError> {
    raw.iter()
        .map(|segment| {
            urlencoding::decode(segment).map(Cow::into_owned).map_err(|_| {
                ProxyError::InvalidPathSegment(segment.to_string())
            })
        })
        .collect()
}
