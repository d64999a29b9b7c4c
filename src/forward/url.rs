//! Upstream URL composition.
//!
//! # Responsibilities
//! - Validate the configured upstream base once, at startup
//! - Append the forwarded path, one percent-encoded segment at a time
//! - Derive the upstream query through the endpoint's credential policy

use url::Url;

use crate::error::ProxyError;
use crate::http::request::QueryParams;
use crate::security::credential::CredentialPolicy;

/// A validated upstream base: absolute http(s) URL with a host, no query or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase(Url);

impl UpstreamBase {
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let malformed = |reason: &str| ProxyError::MalformedUpstreamUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|e| malformed(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(malformed("scheme must be http or https"));
        }
        if url.host_str().is_none() {
            return Err(malformed("missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(malformed("must not carry a query or fragment"));
        }
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

/// Compose the fully-qualified upstream URL.
///
/// Each segment is encoded on its own (`/` inside a segment becomes `%2F`), so
/// segment boundaries survive. Dot segments are dropped rather than resolved.
pub fn build_upstream_url(
    base: &UpstreamBase,
    segments: &[String],
    query: &QueryParams,
    policy: &CredentialPolicy,
) -> Result<Url, ProxyError> {
    let mut url = base.as_url().clone();

    let encoded: Vec<String> = segments
        .iter()
        .filter(|s| !matches!(s.as_str(), "." | ".."))
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    let path = format!("{}/{}", url.path().trim_end_matches('/'), encoded.join("/"));
    url.set_path(&path);

    let forwarded = policy.apply(query)?;
    if forwarded.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&forwarded.to_query_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialMode;
    use crate::security::credential::Credential;

    fn strip() -> CredentialPolicy {
        CredentialPolicy::new(CredentialMode::StripClientValue, "api_key", "NASA_API_KEY", None)
    }

    fn inject(secret: &str) -> CredentialPolicy {
        CredentialPolicy::new(
            CredentialMode::InjectIfAbsent,
            "api_key",
            "NASA_API_KEY",
            Some(Credential::new(secret)),
        )
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_validation() {
        assert!(UpstreamBase::parse("https://api.nasa.gov").is_ok());
        assert!(UpstreamBase::parse("http://127.0.0.1:8080/v1").is_ok());
        assert!(UpstreamBase::parse("api.nasa.gov").is_err());
        assert!(UpstreamBase::parse("ftp://api.nasa.gov").is_err());
        assert!(UpstreamBase::parse("https://api.nasa.gov/?a=1").is_err());
        assert!(UpstreamBase::parse("https://api.nasa.gov/#top").is_err());
        assert!(UpstreamBase::parse("mailto:someone@nasa.gov").is_err());
    }

    #[test]
    fn test_segments_encoded_individually() {
        let base = UpstreamBase::parse("https://images-api.nasa.gov").unwrap();
        let url = build_upstream_url(&base, &segs(&["a b", "c/d"]), &QueryParams::default(), &strip()).unwrap();
        assert_eq!(url.as_str(), "https://images-api.nasa.gov/a%20b/c%2Fd");
    }

    #[test]
    fn test_component_characters() {
        let base = UpstreamBase::parse("https://images-api.nasa.gov").unwrap();
        let url = build_upstream_url(&base, &segs(&["as?set", "x#y", "100%"]), &QueryParams::default(), &strip()).unwrap();
        assert_eq!(url.path(), "/as%3Fset/x%23y/100%25");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_empty_path() {
        let base = UpstreamBase::parse("https://api.nasa.gov").unwrap();
        let url = build_upstream_url(&base, &[], &QueryParams::default(), &strip()).unwrap();
        assert_eq!(url.as_str(), "https://api.nasa.gov/");
    }

    #[test]
    fn test_base_path_is_kept() {
        let base = UpstreamBase::parse("https://api.example.org/neo/rest/v1/").unwrap();
        let url = build_upstream_url(&base, &segs(&["feed"]), &QueryParams::default(), &strip()).unwrap();
        assert_eq!(url.path(), "/neo/rest/v1/feed");
    }

    #[test]
    fn test_dot_segments_dropped() {
        let base = UpstreamBase::parse("https://api.example.org/v1").unwrap();
        let url = build_upstream_url(&base, &segs(&["..", "a", ".", "b"]), &QueryParams::default(), &strip()).unwrap();
        assert_eq!(url.path(), "/v1/a/b");
    }

    #[test]
    fn test_strip_mode_search() {
        let base = UpstreamBase::parse("https://images-api.nasa.gov").unwrap();
        let query = QueryParams::parse(Some("q=mars&api_key=XYZ"));
        let url = build_upstream_url(&base, &segs(&["search"]), &query, &strip()).unwrap();
        assert_eq!(url.as_str(), "https://images-api.nasa.gov/search?q=mars");
    }

    #[test]
    fn test_inject_mode_apod() {
        let base = UpstreamBase::parse("https://api.nasa.gov").unwrap();
        let url = build_upstream_url(
            &base,
            &segs(&["planetary", "apod"]),
            &QueryParams::default(),
            &inject("DEMO_KEY"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://api.nasa.gov/planetary/apod?api_key=DEMO_KEY");
    }

    #[test]
    fn test_query_order_preserved() {
        let base = UpstreamBase::parse("https://api.nasa.gov").unwrap();
        let query = QueryParams::parse(Some("start_date=2024-01-01&end_date=2024-01-07&x=1&x=2"));
        let url = build_upstream_url(&base, &segs(&["neo", "rest", "v1", "feed"]), &query, &inject("K")).unwrap();
        assert_eq!(
            url.query(),
            Some("start_date=2024-01-01&end_date=2024-01-07&x=1&x=2&api_key=K")
        );
    }

    #[test]
    fn test_inject_missing_credential() {
        let base = UpstreamBase::parse("https://api.nasa.gov").unwrap();
        let policy = CredentialPolicy::new(CredentialMode::InjectIfAbsent, "api_key", "NASA_API_KEY", None);
        let err = build_upstream_url(&base, &[], &QueryParams::default(), &policy).unwrap_err();
        assert!(matches!(err, ProxyError::MissingCredential(ref var) if var == "NASA_API_KEY"));
    }
}
