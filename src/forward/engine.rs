//! The forwarding engine shared by every endpoint.

use axum::body::Body;
use axum::http::request::Parts;
use tracing::Instrument;

use crate::config::{CredentialConfig, EndpointConfig};
use crate::error::ProxyError;
use crate::forward::url::{build_upstream_url, UpstreamBase};
use crate::http::client::UpstreamClient;
use crate::http::request::{build_upstream_body, InboundRequest, ProxyMethod, QueryParams, UpstreamRequest};
use crate::http::response::{build_client_response, ClientResponse};
use crate::security::credential::{Credential, CredentialPolicy};
use crate::security::headers::build_upstream_headers;

/// Resolved, read-only settings of one endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfiguration {
    pub name: String,
    pub upstream_base: UpstreamBase,
    pub policy: CredentialPolicy,
    pub requires_credential: bool,
}

impl EndpointConfiguration {
    /// Resolve an endpoint from file configuration and the startup credential.
    pub fn resolve(
        endpoint: &EndpointConfig,
        credential_config: &CredentialConfig,
        credential: Option<Credential>,
    ) -> Result<Self, ProxyError> {
        Ok(Self {
            name: endpoint.name.clone(),
            upstream_base: UpstreamBase::parse(&endpoint.upstream_base)?,
            policy: CredentialPolicy::new(
                endpoint.credential_mode,
                credential_config.query_key.clone(),
                credential_config.env_var.clone(),
                credential,
            ),
            requires_credential: endpoint.requires_credential(),
        })
    }

    /// `Err` while a required credential is missing.
    pub fn check(&self) -> Result<(), ProxyError> {
        if self.requires_credential && !self.policy.has_credential() {
            return Err(self.policy.missing());
        }
        Ok(())
    }
}

/// Forwards requests for one endpoint to its upstream.
#[derive(Debug, Clone)]
pub struct ForwardingEngine {
    config: EndpointConfiguration,
    client: UpstreamClient,
    max_body_bytes: Option<usize>,
}

impl ForwardingEngine {
    pub fn new(config: EndpointConfiguration, client: UpstreamClient, max_body_bytes: Option<usize>) -> Self {
        Self {
            config,
            client,
            max_body_bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &EndpointConfiguration {
        &self.config
    }

    /// Compose the upstream request. Pure: no I/O.
    pub fn build_upstream_request(&self, inbound: InboundRequest) -> Result<UpstreamRequest, ProxyError> {
        let url = build_upstream_url(
            &self.config.upstream_base,
            &inbound.segments,
            &inbound.query,
            &self.config.policy,
        )?;

        Ok(UpstreamRequest {
            method: inbound.method.as_method(),
            url,
            headers: build_upstream_headers(&inbound.headers),
            body: inbound.body,
        })
    }

    /// Run the whole request/response cycle for one inbound request.
    ///
    /// Configuration is checked before the body is read, so a misconfigured
    /// endpoint never touches the upstream.
    pub async fn forward(
        &self,
        parts: Parts,
        body: Body,
        segments: Vec<String>,
    ) -> Result<ClientResponse, ProxyError> {
        self.config.check()?;

        let method = ProxyMethod::try_from(&parts.method)?;
        let inbound = InboundRequest {
            method,
            segments,
            query: QueryParams::parse(parts.uri.query()),
            headers: parts.headers,
            body: build_upstream_body(method, body, self.max_body_bytes).await?,
        };

        let request = self.build_upstream_request(inbound)?;
        let target = self.config.policy.redact(&request.url);
        tracing::debug!(upstream = %target, "Forwarding upstream");

        let response = self
            .client
            .execute(request)
            .instrument(tracing::debug_span!("upstream", url = %target))
            .await?;

        tracing::debug!(status = %response.status, bytes = response.body.len(), "Upstream responded");
        Ok(build_client_response(response.status, &response.headers, response.body))
    }
}
