//! Security header subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     SecurityConfig
//!     → builder.rs (named protections, fixed order, then umbrella, then disables)
//!     → PolicySet (immutable, Arc-shared)
//!
//! Per request:
//!     → predicate.rs (which directives apply to this request)
//!     → policy.rs (resolve: last write wins per header)
//!     → headers.rs (write onto the response)
//! ```
//!
//! # Design Decisions
//! - One final value per header name, never merged
//! - A later disable removes the header outright
//! - Contradictions (set, then removed) are reported at startup

pub mod builder;
pub mod headers;
pub mod policy;
pub mod predicate;

pub use builder::{PolicyBuilder, PolicyError};
pub use headers::security_headers_middleware;
pub use policy::{DirectiveAction, HeaderDirective, PolicySet, ResolvedHeaders};
pub use predicate::{RequestHead, RequestPredicate, SecureTransport};
