use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    error::AppError,
    metrics,
    pricing::{self, PricingReport},
    server::AppState,
};

/// Handle POST /api/calculate-pricing
///
/// Validates the raw JSON body, runs the engine and records the calculation
/// in the activity log. Malformed JSON and invalid fields both answer 400.
pub async fn calculate_pricing(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PricingReport>, AppError> {
    let start = Instant::now();

    let Json(raw) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

    let input = pricing::validate(&raw).map_err(|err| {
        debug!(field = err.field, reason = %err.reason, "Rejected pricing input");
        metrics::record_validation_failure(err.field, err.reason.as_str());
        AppError::Validation(err)
    })?;

    let report = pricing::calculate(&input);

    metrics::record_calculation(input.support_tier.as_str(), input.contract_length.as_str());
    for skipped in &report.not_applicable {
        metrics::record_not_applicable(skipped.metric.as_str());
    }

    let record = state.activity.record_calculation(&input, &report).await;
    metrics::record_calculation_duration(start.elapsed());

    info!(
        id = %record.id,
        customers = input.customers,
        support_tier = %input.support_tier,
        contract_length = %input.contract_length,
        monthly_price = report.monthly_price,
        "Calculated pricing"
    );

    Ok(Json(report))
}
