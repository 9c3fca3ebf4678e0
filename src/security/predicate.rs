//! Request predicates that gate header directives.
//!
//! # Design Decisions
//! - Predicates see only the request head (URI and headers), never the body
//! - Scheme detection trusts `X-Forwarded-Proto` so HTTPS terminated at a
//!   front proxy still counts as secure

use axum::http::{HeaderMap, Request, Uri};

/// The parts of a request a predicate may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a> {
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestHead<'a> {
    pub fn of<B>(req: &'a Request<B>) -> Self {
        Self {
            uri: req.uri(),
            headers: req.headers(),
        }
    }
}

/// Condition a directive requires before it applies to an exchange.
pub trait RequestPredicate: Send + Sync + std::fmt::Debug {
    /// Returns true if the directive should apply to this request.
    fn holds(&self, req: &RequestHead<'_>) -> bool;
}

/// Holds when the request arrived over HTTPS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureTransport;

impl RequestPredicate for SecureTransport {
    fn holds(&self, req: &RequestHead<'_>) -> bool {
        if req.uri.scheme_str() == Some("https") {
            return true;
        }

        // First hop wins when several proxies appended to the header.
        req.headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false)
    }
}
