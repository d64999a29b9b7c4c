//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (endpoint lookup)
//!     → matcher.rs (segment-aware prefix match)
//!     → Return: matched ForwardingEngine + raw remainder, or NoMatch
//!     → decode remainder per segment (invalid UTF-8 is a 400)
//!
//! Route Compilation (at startup):
//!     EndpointConfig[]
//!     → Resolve into ForwardingEngine
//!     → Sort by prefix depth
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same path always matches same endpoint
//! - Every method is routed identically

pub mod matcher;
pub mod router;

pub use matcher::{decode_segments, MountPrefix};
pub use router::{Route, RouteMatch, Router};
