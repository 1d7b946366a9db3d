use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::server::AppState;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    fn resolve(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Handle GET /admin/calculations
pub async fn list_calculations(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let calculations = state.activity.recent_calculations(query.resolve()).await;
    Json(json!({
        "count": calculations.len(),
        "calculations": calculations,
    }))
}

/// Handle GET /admin/purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let purchases = state.activity.recent_purchases(query.resolve()).await;
    Json(json!({
        "count": purchases.len(),
        "purchases": purchases,
    }))
}

/// Handle GET /admin/summary
pub async fn summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.activity.summary().await)
}
