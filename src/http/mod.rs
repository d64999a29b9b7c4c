//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → [routing layer picks the endpoint]
//!     → request.rs (inbound model, body presence rule)
//!     → client.rs (single upstream call)
//!     → response.rs (strip hop-by-hop, relay status/body)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use client::UpstreamClient;
pub use request::{InboundRequest, ProxyMethod, QueryParams, UpstreamRequest};
pub use response::{ClientResponse, UpstreamResponse};
pub use server::HttpServer;
