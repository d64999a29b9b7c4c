//! Response handling and transformation.
//!
//! # Responsibilities
//! - Transform the upstream response for the client
//! - Strip hop-by-hop headers
//! - Relay status and body bytes unchanged

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::security::headers::strip_hop_by_hop;

/// Fully-read upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Response relayed to the browser.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Build the client response: same status, same body, headers minus hop-by-hop.
pub fn build_client_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> ClientResponse {
    ClientResponse {
        status,
        headers: strip_hop_by_hop(headers),
        body,
    }
}

impl From<UpstreamResponse> for ClientResponse {
    fn from(upstream: UpstreamResponse) -> Self {
        build_client_response(upstream.status, &upstream.headers, upstream.body)
    }
}

impl IntoResponse for ClientResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
