//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint mount prefixes and upstream bases
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::forward::url::UpstreamBase;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("duplicate endpoint name '{0}'")]
    DuplicateName(String),

    #[error("duplicate mount prefix '{0}'")]
    DuplicatePrefix(String),

    #[error("endpoint '{endpoint}': mount prefix '{prefix}' must start with '/'")]
    PrefixNotAbsolute { endpoint: String, prefix: String },

    #[error("endpoint '{endpoint}': mount prefix '{prefix}' must not end with '/'")]
    PrefixTrailingSlash { endpoint: String, prefix: String },

    #[error("endpoint '{endpoint}': {reason}")]
    UpstreamBase { endpoint: String, reason: String },

    #[error("credential.{0} must not be empty")]
    EmptyCredentialField(&'static str),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs ({request}) must exceed timeouts.upstream_secs ({upstream})")]
    RequestTimeoutNotAboveUpstream { request: u64, upstream: u64 },

    #[error("invalid socket address '{value}' for {field}")]
    Address { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.credential.env_var.trim().is_empty() {
        errors.push(ValidationError::EmptyCredentialField("env_var"));
    }
    if config.credential.query_key.is_empty() {
        errors.push(ValidationError::EmptyCredentialField("query_key"));
    }

    for (field, value) in [
        ("connect_secs", config.timeouts.connect_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
        ("request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    let (request, upstream) = (config.timeouts.request_secs, config.timeouts.upstream_secs);
    if upstream > 0 && request <= upstream {
        errors.push(ValidationError::RequestTimeoutNotAboveUpstream { request, upstream });
    }

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }

    let mut names = HashSet::new();
    let mut prefixes = HashSet::new();
    for endpoint in &config.endpoints {
        if !names.insert(endpoint.name.as_str()) {
            errors.push(ValidationError::DuplicateName(endpoint.name.clone()));
        }
        if !prefixes.insert(endpoint.mount_prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix(endpoint.mount_prefix.clone()));
        }

        let prefix = &endpoint.mount_prefix;
        if !prefix.starts_with('/') {
            errors.push(ValidationError::PrefixNotAbsolute {
                endpoint: endpoint.name.clone(),
                prefix: prefix.clone(),
            });
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            errors.push(ValidationError::PrefixTrailingSlash {
                endpoint: endpoint.name.clone(),
                prefix: prefix.clone(),
            });
        }

        if let Err(e) = UpstreamBase::parse(&endpoint.upstream_base) {
            errors.push(ValidationError::UpstreamBase {
                endpoint: endpoint.name.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
