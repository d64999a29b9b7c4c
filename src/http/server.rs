//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Resolve endpoints into forwarding engines at startup
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing)
//! - Dispatch requests to the routing table under the request deadline
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - The request deadline is enforced in the handler so an expiry still
//!   answers with the JSON error shape

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, StartupError};
use crate::forward::{EndpointConfiguration, ForwardingEngine};
use crate::http::client::UpstreamClient;
use crate::observability::metrics;
use crate::routing::{MountPrefix, Route, Router as ProxyRouter};
use crate::security::credential::Credential;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub request_timeout: Duration,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server.
    ///
    /// `credential` is the value read from the environment at startup. Its
    /// absence is not fatal here; endpoints that need it answer every request
    /// with a configuration error instead.
    pub fn new(config: ProxyConfig, credential: Option<Credential>) -> Result<Self, StartupError> {
        let client = UpstreamClient::new(&config.timeouts)?;

        let mut routes = Vec::with_capacity(config.endpoints.len());
        for endpoint in &config.endpoints {
            let resolved = EndpointConfiguration::resolve(endpoint, &config.credential, credential.clone())
                .map_err(|source| StartupError::Endpoint {
                    endpoint: endpoint.name.clone(),
                    source,
                })?;

            if let Err(e) = resolved.check() {
                tracing::warn!(
                    endpoint = %endpoint.name,
                    error = %e,
                    "Endpoint will reject every request until the credential is configured"
                );
            }

            let prefix = MountPrefix::new(endpoint.mount_prefix.clone());
            tracing::info!(
                endpoint = %endpoint.name,
                mount_prefix = %prefix.as_str(),
                upstream = %resolved.upstream_base.as_url(),
                mode = ?endpoint.credential_mode,
                "Endpoint mounted"
            );

            routes.push(Route {
                prefix,
                engine: Arc::new(ForwardingEngine::new(
                    resolved,
                    client.clone(),
                    config.listener.max_body_bytes,
                )),
            });
        }

        let state = AppState {
            router: Arc::new(ProxyRouter::new(routes)),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// The assembled router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Looks up the endpoint and forwards the request through its engine.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let Some(route) = state.router.match_path(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "No endpoint matched");
        metrics::record_request("none", &method, 404, start_time);
        return ProxyError::NoRoute(path).into_response();
    };

    let engine = Arc::clone(route.engine);
    let span = tracing::info_span!(
        "forward",
        request_id = %request_id,
        endpoint = %engine.name(),
        method = %method,
    );

    let forwarded = match route.segments() {
        Ok(segments) => {
            let forward = engine.forward(parts, body, segments).instrument(span.clone());
            tokio::time::timeout(state.request_timeout, forward)
                .await
                .unwrap_or_else(|_| {
                    Err(ProxyError::UpstreamUnreachable(format!(
                        "timed out: no response within {}s",
                        state.request_timeout.as_secs()
                    )))
                })
        }
        Err(e) => Err(e),
    };

    let response = match forwarded {
        Ok(response) => response.into_response(),
        Err(e) => {
            span.in_scope(|| match &e {
                ProxyError::UpstreamUnreachable(_) => {
                    tracing::error!(error = %e, "Upstream error");
                    metrics::record_upstream_error(engine.name());
                }
                err if err.is_configuration() => {
                    tracing::error!(error = %err, "Endpoint misconfigured")
                }
                err => tracing::warn!(error = %err, "Request rejected"),
            });
            e.into_response()
        }
    };

    metrics::record_request(engine.name(), &method, response.status().as_u16(), start_time);
    response
}
