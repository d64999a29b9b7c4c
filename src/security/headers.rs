//! Header sanitization on both legs of the proxy.
//!
//! # Responsibilities
//! - Drop the inbound `Host` before forwarding upstream
//! - Strip hop-by-hop headers from upstream responses
//! - Drop framing headers the upstream client recomputes
//!
//! # Design Decisions
//! - Header names are matched case-insensitively (`HeaderName` is lowercase)
//! - Repeated headers are preserved; nothing collapses a multimap

use axum::http::{header, HeaderMap, HeaderName};

/// Response headers that describe a single connection leg.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "transfer-encoding",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "upgrade",
];

/// Request headers owned by the upstream HTTP client once the body is buffered.
pub const CLIENT_MANAGED_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.as_str().eq_ignore_ascii_case(h))
}

/// Copy every inbound header except `Host`.
pub fn build_upstream_headers(inbound: &HeaderMap) -> HeaderMap {
    filter_headers(inbound, |name| *name != header::HOST)
}

/// Copy every upstream header except the hop-by-hop denylist.
pub fn strip_hop_by_hop(upstream: &HeaderMap) -> HeaderMap {
    filter_headers(upstream, |name| !is_hop_by_hop(name))
}

/// Remove connection framing headers in place.
pub fn strip_client_managed(headers: &mut HeaderMap) {
    for name in CLIENT_MANAGED_HEADERS {
        headers.remove(*name);
    }
}

fn filter_headers(source: &HeaderMap, keep: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(source.len());
    for (name, value) in source.iter() {
        if keep(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
