//! Header Shield Library
//!
//! A small web server that puts a fixed security header policy in front of
//! an index page, static assets and a nested sub-application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::PolicySet;
