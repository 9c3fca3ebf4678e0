//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`, fields instead of formatted text
//! - Per-request spans come from tower-http's `TraceLayer`

pub mod logging;
