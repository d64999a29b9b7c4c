//! Forwarding engine.
//!
//! # Data Flow
//! ```text
//! Request leg:
//!     Parts + Body + path segments
//!     → engine.rs (configuration check, InboundRequest)
//!     → url.rs (base + encoded segments + credential policy)
//!     → security::headers (drop Host)
//!     → http::client (single call, redirects followed)
//!
//! Response leg:
//!     UpstreamResponse
//!     → http::response (status/body verbatim, hop-by-hop stripped)
//!     → ClientResponse
//! ```
//!
//! # Design Decisions
//! - One engine type for every endpoint; endpoints differ only by configuration
//! - Stateless per request; the only shared state is read-only
//! - No caching, retries or payload transformation

pub mod engine;
pub mod url;

pub use engine::{EndpointConfiguration, ForwardingEngine};
pub use self::url::{build_upstream_url, UpstreamBase};
