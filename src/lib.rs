//! Transparent forwarding proxy for the catalog viewer's upstream APIs.
//!
//! Forwards any of GET/POST/PUT/PATCH/DELETE/OPTIONS/HEAD under a mount
//! prefix to an upstream base URL, injecting or stripping the server-held
//! API credential and sanitizing hop-by-hop headers on both legs.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, StartupError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::credential::Credential;
