//! Error taxonomy for the forwarding proxy.
//!
//! # Design Decisions
//! - Every per-request failure renders as a complete JSON response
//!   (`{"error": "..."}`); nothing is retried or partially written
//! - Startup failures are a separate type and abort the process

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors produced while forwarding a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The server-held credential is required but was not configured.
    #[error("{0} not set on server")]
    MissingCredential(String),

    /// Network, DNS, TLS or timeout failure talking to the upstream.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The configured upstream base cannot be used to compose URLs.
    #[error("invalid upstream base URL '{url}': {reason}")]
    MalformedUpstreamUrl { url: String, reason: String },

    /// Method outside GET/POST/PUT/PATCH/DELETE/OPTIONS/HEAD.
    #[error("method {0} is not supported")]
    MethodNotAllowed(Method),

    /// The inbound body could not be read.
    #[error("failed to read request body: {0}")]
    InboundBody(String),

    /// A path segment's percent-escapes do not decode to UTF-8.
    #[error("path segment '{0}' is not valid UTF-8")]
    InvalidPathSegment(String),

    /// No endpoint is mounted under the requested path.
    #[error("no endpoint mounted at {0}")]
    NoRoute(String),
}

impl ProxyError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredential(_) | ProxyError::MalformedUpstreamUrl { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InboundBody(_) | ProxyError::InvalidPathSegment(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoRoute(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Whether this is a configuration problem rather than a request or network one.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProxyError::MissingCredential(_) | ProxyError::MalformedUpstreamUrl { .. }
        )
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Fatal conditions detected while starting the proxy.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: ProxyError,
    },

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
