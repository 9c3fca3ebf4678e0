//! Security header middleware.
//!
//! # Responsibilities
//! - Resolve the policy against each inbound request
//! - Write the resolved headers onto the response before the body is sent
//! - Strip headers the policy removes, whoever set them
//!
//! # Design Decisions
//! - Outermost layer, so static files, the sub-application and framework
//!   error responses are all covered
//! - Never fails: the policy was validated at startup

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::security::policy::PolicySet;
use crate::security::predicate::RequestHead;

pub async fn security_headers_middleware(
    State(policy): State<Arc<PolicySet>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let resolved = policy.resolve(&RequestHead::of(&req));

    let mut response = next.run(req).await;
    resolved.apply(response.headers_mut());

    tracing::trace!(headers = resolved.len(), "Security headers applied");
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::security::builder::{PolicyBuilder, X_POWERED_BY};
    use axum::{
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(policy: PolicySet) -> Router {
        Router::new()
            .route(
                "/",
                get(|| async {
                    let headers = [(X_POWERED_BY, "Express"), (header::X_FRAME_OPTIONS, "ALLOWALL")];
                    (headers, "ok")
                }),
            )
            .layer(middleware::from_fn_with_state(
                Arc::new(policy),
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_policy_overrides_handler_headers() {
        let policy = PolicyBuilder::from_config(&SecurityConfig::default()).unwrap();
        let response = app(policy)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(!response.headers().contains_key(X_POWERED_BY));
        assert!(!response.headers().contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_not_found_is_covered() {
        let policy = PolicyBuilder::new().no_sniff().build();
        let response = app(policy)
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }
}
