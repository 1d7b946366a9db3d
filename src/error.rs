use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use std::fmt;
use tracing::error;

use crate::catalog::CatalogError;
use crate::pricing::ValidationError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Pricing input failed validation
    Validation(ValidationError),
    /// Request body is not valid JSON
    InvalidBody(String),
    /// Checkout request could not be priced from the catalog
    Catalog(CatalogError),
    /// Authentication error
    Unauthorized(String),
    /// A handler panicked
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation error: {}", err),
            Self::InvalidBody(msg) => write!(f, "Invalid request body: {}", msg),
            Self::Catalog(err) => write!(f, "Checkout error: {}", err),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        crate::metrics::record_error(error_type_name(&self));

        // Validation failures name the field and the reason
        if let Self::Validation(err) = &self {
            let body = Json(json!({
                "success": false,
                "error": {
                    "field": err.field,
                    "reason": err.reason,
                    "message": err.to_string(),
                }
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, error_message) = match &self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::InvalidBody(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Catalog(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

pub(crate) fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Validation(_) => "validation_error",
        AppError::InvalidBody(_) => "invalid_body",
        AppError::Catalog(_) => "checkout_error",
        AppError::Unauthorized(_) => "unauthorized",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// Turn a handler panic into a 500 with the usual error envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(detail = %detail, "Handler panicked");
    AppError::InternalError("Unexpected error while handling the request".to_string())
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::ValidationReason;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let error = AppError::Unauthorized("Invalid API key".to_string());
        assert_eq!(error.to_string(), "Unauthorized: Invalid API key");
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(error_type_name(&AppError::Unauthorized("test".to_string())), "unauthorized");
        assert_eq!(error_type_name(&AppError::InvalidBody("test".to_string())), "invalid_body");
        assert_eq!(
            error_type_name(&AppError::Catalog(CatalogError::UnknownTier("gold".to_string()))),
            "checkout_error"
        );
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let error = AppError::from(ValidationError {
            field: "churnRate",
            reason: ValidationReason::OutOfRange,
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["field"], "churnRate");
        assert_eq!(body["error"]["reason"], "out_of_range");
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_internal_error() {
        use axum::{body::Body, http::Request, routing::get, Router};
        use tower::ServiceExt;
        use tower_http::catch_panic::CatchPanicLayer;

        async fn broken() -> &'static str {
            panic!("engine invariant violated")
        }

        let app = Router::new()
            .route("/broken", get(broken))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/broken").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "internal_error");
    }

    #[tokio::test]
    async fn test_unauthorized_response() {
        let error = AppError::Unauthorized("Invalid API key".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "unauthorized");
    }
}
