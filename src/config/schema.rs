//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the catalog proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Where the upstream credential comes from and how it is named.
    pub credential: CredentialConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Mounted forwarding endpoints.
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            credential: CredentialConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            endpoints: default_endpoints(),
        }
    }
}

/// The media-library and open-data endpoints.
pub fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig {
            name: "media-library".to_string(),
            mount_prefix: "/api/nasa/images".to_string(),
            upstream_base: "https://images-api.nasa.gov".to_string(),
            credential_mode: CredentialMode::StripClientValue,
            require_credential: None,
        },
        EndpointConfig {
            name: "open-data".to_string(),
            mount_prefix: "/api/nasa".to_string(),
            upstream_base: "https://api.nasa.gov".to_string(),
            credential_mode: CredentialMode::InjectIfAbsent,
            require_credential: None,
        },
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Upper bound on a buffered request body. Unset means unbounded.
    pub max_body_bytes: Option<usize>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            max_body_bytes: None,
        }
    }
}

/// Credential source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable holding the upstream API key.
    pub env_var: String,

    /// Query parameter name carrying the key upstream.
    pub query_key: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            env_var: "NASA_API_KEY".to_string(),
            query_key: "api_key".to_string(),
        }
    }
}

/// How an endpoint treats the credential query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialMode {
    /// Drop any client-supplied value; never add one.
    StripClientValue,
    /// Keep the client value; append the server credential when absent.
    InjectIfAbsent,
}

/// A forwarding endpoint: mount prefix to upstream base.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Endpoint identifier for logging/metrics.
    pub name: String,

    /// Path prefix the endpoint is mounted under.
    pub mount_prefix: String,

    /// Upstream base URL (scheme + authority, optional base path).
    pub upstream_base: String,

    /// Credential policy.
    pub credential_mode: CredentialMode,

    /// Whether a missing credential fails every request.
    /// Defaults to true for `inject-if-absent`, false otherwise.
    #[serde(default)]
    pub require_credential: Option<bool>,
}

impl EndpointConfig {
    pub fn requires_credential(&self) -> bool {
        self.require_credential
            .unwrap_or(self.credential_mode == CredentialMode::InjectIfAbsent)
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total upstream call timeout (including redirects and body) in seconds.
    pub upstream_secs: u64,

    /// Outer timeout for a whole inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
