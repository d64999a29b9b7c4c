//! Server-held credential and the query policy that applies it.
//!
//! # Responsibilities
//! - Hold the upstream API key without exposing it through `Debug`
//! - Strip or inject the credential query parameter per endpoint mode

use std::fmt;

use crate::config::CredentialMode;
use crate::error::ProxyError;
use crate::http::request::QueryParams;

/// Upstream API key, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the credential from an environment variable. Empty counts as unset.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Credential handling for one endpoint.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    mode: CredentialMode,
    query_key: String,
    source: String,
    credential: Option<Credential>,
}

impl CredentialPolicy {
    /// `source` names where the credential comes from (the env var) for diagnostics.
    pub fn new(
        mode: CredentialMode,
        query_key: impl Into<String>,
        source: impl Into<String>,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            mode,
            query_key: query_key.into(),
            source: source.into(),
            credential,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Error reported while the credential is missing.
    pub fn missing(&self) -> ProxyError {
        ProxyError::MissingCredential(self.source.clone())
    }

    /// Derive the upstream query from the inbound one.
    ///
    /// Strip mode drops every pair keyed by the credential name. Inject mode
    /// keeps the inbound pairs and appends the server value once, only when the
    /// client did not send its own.
    pub fn apply(&self, inbound: &QueryParams) -> Result<QueryParams, ProxyError> {
        match self.mode {
            CredentialMode::StripClientValue => Ok(inbound.without_key(&self.query_key)),
            CredentialMode::InjectIfAbsent => {
                let mut query = inbound.clone();
                if !query.contains_key(&self.query_key) {
                    let credential = self.credential.as_ref().ok_or_else(|| self.missing())?;
                    query.push(self.query_key.clone(), credential.expose());
                }
                Ok(query)
            }
        }
    }

    /// Render a URL for logs with the credential value masked.
    pub fn redact(&self, url: &url::Url) -> String {
        let Some(credential) = &self.credential else {
            return url.to_string();
        };
        let mut redacted = url.clone();
        if url.query().is_some() {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| {
                    if k == self.query_key && v == credential.expose() {
                        (k.into_owned(), "***".to_string())
                    } else {
                        (k.into_owned(), v.into_owned())
                    }
                })
                .collect();
            redacted.query_pairs_mut().clear().extend_pairs(pairs);
        }
        redacted.to_string()
    }
}
