//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → headers.rs (drop Host)
//!     → credential.rs (strip or inject the credential query parameter)
//!     → Forward upstream
//!
//! Upstream response:
//!     → headers.rs (strip hop-by-hop)
//!     → Relay to client
//! ```
//!
//! # Design Decisions
//! - Header filtering lives here and nowhere else
//! - The credential never reaches logs, error bodies or `Debug` output

pub mod credential;
pub mod headers;
