use crate::{config::Config, error::AppError};
use arc_swap::ArcSwap;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Operator identity attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// Name of the API key used for authentication
    pub api_key_name: String,
}

/// Authentication middleware for operator routes
/// Extracts and validates the Bearer token from the Authorization header
pub async fn auth_middleware(
    State(config): State<Arc<ArcSwap<Config>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_bearer_token(auth_header)?;

    // Load current configuration
    let config = config.load();

    let api_key_name = find_api_key(&config, token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or disabled API key".to_string()))?;

    debug!(api_key = %api_key_name, path = %req.uri().path(), "Operator request authenticated");

    req.extensions_mut().insert(AuthInfo { api_key_name });

    Ok(next.run(req).await)
}

/// Match a token against enabled keys without short-circuiting on content
fn find_api_key(config: &Config, token: &str) -> Option<String> {
    let mut matched = None;
    for key in config.api_keys.iter().filter(|k| k.enabled) {
        if bool::from(key.key.as_bytes().ct_eq(token.as_bytes())) {
            matched = Some(key.name.clone());
        }
    }
    matched
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    const BEARER_PREFIX: &str = "Bearer ";

    let token = auth_header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        AppError::Unauthorized("Authorization header must use Bearer scheme".to_string())
    })?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token)
}
