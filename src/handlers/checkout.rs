use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::AuthInfo,
    catalog::{CheckoutQuote, CheckoutRequest},
    error::AppError,
    metrics,
    server::AppState,
};

/// Handle GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load();
    Json(config.catalog.clone())
}

/// Handle POST /api/checkout/quote
///
/// Prices a tier from the static catalog. The amount never comes from a
/// live calculation.
pub async fn quote_checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutQuote>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

    let quote = state.config.load().catalog.quote(&request)?;
    metrics::record_checkout(quote.tier.as_str(), quote.billing_cycle.as_str(), "quote");

    Ok(Json(quote))
}

/// Completion notice from the payment collaborator
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCheckoutRequest {
    pub tier_name: String,
    pub billing_cycle: String,
    pub session_id: String,
}

/// Handle POST /api/checkout/complete (operator key required)
pub async fn complete_checkout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    payload: Result<Json<CompleteCheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

    let session_id = body.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::InvalidBody("sessionId cannot be empty".to_string()));
    }

    let quote = state.config.load().catalog.quote(&CheckoutRequest {
        tier_name: body.tier_name,
        billing_cycle: body.billing_cycle,
    })?;

    let purchase = state.activity.record_purchase(&quote, session_id).await;
    metrics::record_checkout(quote.tier.as_str(), quote.billing_cycle.as_str(), "purchase");

    info!(
        id = %purchase.id,
        api_key = %auth.api_key_name,
        tier = %quote.tier,
        billing_cycle = %quote.billing_cycle,
        amount_cents = quote.amount_cents,
        "Checkout completed"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "purchase": purchase,
        })),
    ))
}
