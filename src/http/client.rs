//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Perform exactly one upstream call per request (redirects followed)
//! - Enforce connect and total timeouts
//! - Map every transport failure to `UpstreamUnreachable`
//!
//! # Design Decisions
//! - No retries; a failure is terminal for the request
//! - Transport errors are stripped of their URL, which carries the credential
//! - No `Referer` on redirect hops, for the same reason
//! - Dropping the `execute` future abandons the upstream call

use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::error::ProxyError;
use crate::http::request::UpstreamRequest;
use crate::http::response::UpstreamResponse;
use crate::security::headers::strip_client_managed;

/// Maximum redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Shared client for all endpoints. Cloning is cheap (pooled connections are shared).
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            // The previous hop's URL carries the credential.
            .referer(false)
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;
        Ok(Self { inner })
    }

    /// Send the request and read the full response.
    pub async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let UpstreamRequest {
            method,
            url,
            mut headers,
            body,
        } = request;

        // The body is re-framed from a buffer, so the client sets its own length.
        strip_client_managed(&mut headers);

        let mut builder = self.inner.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(unreachable)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(unreachable)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn unreachable(err: reqwest::Error) -> ProxyError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_redirect() {
        "redirect limit exceeded"
    } else {
        "request failed"
    };
    ProxyError::UpstreamUnreachable(format!("{}: {}", kind, err.without_url()))
}
