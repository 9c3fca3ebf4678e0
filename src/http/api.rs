//! Sub-application nested under the API prefix.
//!
//! # Responsibilities
//! - `GET app-info`: report the security headers in effect for the caller
//! - `GET health`: liveness probe
//!
//! Paths are relative; the server decides the prefix.

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::security::{PolicySet, RequestHead};

/// What the policy does to responses for the requesting client.
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub version: &'static str,

    /// Headers set on responses, lowercase name to value.
    pub headers: BTreeMap<String, String>,

    /// Headers stripped from responses.
    pub removed: Vec<String>,
}

pub fn api_router(policy: Arc<PolicySet>) -> Router {
    Router::new()
        .route("/app-info", get(get_app_info))
        .route("/health", get(get_health))
        .with_state(policy)
}

async fn get_app_info(
    State(policy): State<Arc<PolicySet>>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<AppInfo> {
    let head = RequestHead {
        uri: &uri,
        headers: &headers,
    };
    let resolved = policy.resolve(&head);

    let set = resolved
        .set_headers()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let removed = resolved
        .removed_headers()
        .map(|name| name.as_str().to_string())
        .collect();

    Json(AppInfo {
        version: env!("CARGO_PKG_VERSION"),
        headers: set,
        removed,
    })
}

async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
