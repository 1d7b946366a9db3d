use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "saas-pricing-calculator",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Readiness check endpoint
///
/// The router only exists after configuration has been loaded and validated
/// (API keys, a catalog plan for every tier) and the listener is bound. The
/// engine keeps no connections or caches, so answering at all means the
/// instance can price requests and quote checkouts.
pub async fn readiness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "service": "saas-pricing-calculator",
        })),
    )
}
