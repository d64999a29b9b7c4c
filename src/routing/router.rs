//! Endpoint lookup and dispatch.
//!
//! # Responsibilities
//! - Store mounted endpoints
//! - Look up the endpoint for a request path
//! - Return the matched engine and path remainder, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest mount prefix wins, so nested mounts work regardless of order
//! - O(n) prefix scan (acceptable for a handful of endpoints)

use std::sync::Arc;

use crate::error::ProxyError;
use crate::forward::ForwardingEngine;
use crate::routing::matcher::{decode_segments, MountPrefix};

/// A mounted endpoint.
#[derive(Debug, Clone)]
pub struct Route {
    pub prefix: MountPrefix,
    pub engine: Arc<ForwardingEngine>,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub engine: &'a Arc<ForwardingEngine>,
    /// Path remainder, still percent-encoded.
    pub remainder: Vec<&'a str>,
}

impl RouteMatch<'_> {
    /// Decoded path remainder.
    pub fn segments(&self) -> Result<Vec<String>, ProxyError> {
        decode_segments(&self.remainder)
    }
}

/// Immutable mount table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(mut routes: Vec<Route>) -> Self {
        // Deepest prefix first; stable sort keeps config order on ties.
        routes.sort_by(|a, b| b.prefix.depth().cmp(&a.prefix.depth()));
        Self { routes }
    }

    /// Find the endpoint serving `path`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes.iter().find_map(|route| {
            route.prefix.strip(path).map(|remainder| RouteMatch {
                engine: &route.engine,
                remainder,
            })
        })
    }
}
