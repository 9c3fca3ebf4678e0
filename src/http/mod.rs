//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security headers resolved for the request
//!     → "/"            → pages.rs (fixed HTML document)
//!     → "<api_prefix>" → api.rs (sub-application)
//!     → anything else  → static files
//!     → security headers written onto the response
//!     → Send to client
//! ```

pub mod api;
pub mod pages;
pub mod server;

pub use server::{HttpServer, ServerError};
