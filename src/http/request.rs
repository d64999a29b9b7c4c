//! Request handling and transformation.
//!
//! # Responsibilities
//! - Model the inbound request with explicit, order-preserving fields
//! - Apply the body presence rule (no body for GET/HEAD)
//! - Carry the composed upstream request to the client
//!
//! # Design Decisions
//! - Query and headers are multimaps; duplicate keys are never collapsed
//! - Bodies are buffered whole; the optional limit is a deployment concern

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method};
use url::Url;

use crate::error::ProxyError;

/// The seven methods the proxy forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl ProxyMethod {
    pub const ALL: [ProxyMethod; 7] = [
        ProxyMethod::Get,
        ProxyMethod::Post,
        ProxyMethod::Put,
        ProxyMethod::Patch,
        ProxyMethod::Delete,
        ProxyMethod::Options,
        ProxyMethod::Head,
    ];

    /// GET and HEAD never carry a body upstream.
    pub fn carries_body(self) -> bool {
        !matches!(self, ProxyMethod::Get | ProxyMethod::Head)
    }

    pub fn as_method(self) -> Method {
        match self {
            ProxyMethod::Get => Method::GET,
            ProxyMethod::Post => Method::POST,
            ProxyMethod::Put => Method::PUT,
            ProxyMethod::Patch => Method::PATCH,
            ProxyMethod::Delete => Method::DELETE,
            ProxyMethod::Options => Method::OPTIONS,
            ProxyMethod::Head => Method::HEAD,
        }
    }
}

impl TryFrom<&Method> for ProxyMethod {
    type Error = ProxyError;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        ProxyMethod::ALL
            .into_iter()
            .find(|m| m.as_method() == *method)
            .ok_or_else(|| ProxyError::MethodNotAllowed(method.clone()))
    }
}

/// Ordered query-parameter multimap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parse a raw query string (`application/x-www-form-urlencoded`).
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self(pairs)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Copy of the pairs with every `key` entry removed, order kept.
    pub fn without_key(&self, key: &str) -> Self {
        Self(self.0.iter().filter(|(k, _)| k != key).cloned().collect())
    }

    /// Serialize back to a query string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A browser request after routing, ready for the forwarding engine.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: ProxyMethod,
    /// Percent-decoded path remainder below the mount prefix.
    pub segments: Vec<String>,
    pub query: QueryParams,
    pub headers: HeaderMap,
    /// Present only for methods that carry a body.
    pub body: Option<Bytes>,
}

/// Request as it will be sent upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Read the inbound body for methods that carry one.
///
/// GET and HEAD yield `None` without touching the stream; everything else is
/// buffered whole and returned verbatim (possibly empty).
pub async fn build_upstream_body(
    method: ProxyMethod,
    body: Body,
    limit: Option<usize>,
) -> Result<Option<Bytes>, ProxyError> {
    if !method.carries_body() {
        return Ok(None);
    }

    let bytes = axum::body::to_bytes(body, limit.unwrap_or(usize::MAX))
        .await
        .map_err(|e| ProxyError::InboundBody(e.to_string()))?;
    Ok(Some(bytes))
}
