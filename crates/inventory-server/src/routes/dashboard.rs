//! Dashboard counters.
//!
//! - GET /dashboard/count - Total number of items
//! - GET /dashboard/low?min= - Number of items below the low-stock threshold

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::auth::ItemAccess;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockResponse {
    pub low_count: i64,
    /// Threshold that was applied. Whole numbers serialize without a fraction.
    pub min: Number,
}

#[derive(Debug, Default, Deserialize)]
pub struct LowStockParams {
    pub min: Option<String>,
}

/// Threshold from the request, or `default` when absent or not a finite
/// number.
fn threshold(params: &LowStockParams, default: i64) -> f64 {
    params
        .min
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|min| min.is_finite())
        .unwrap_or(default as f64)
}

fn threshold_number(min: f64) -> Number {
    if min.fract() == 0.0 && min.abs() < 9.0e15 {
        Number::from(min as i64)
    } else {
        Number::from_f64(min).unwrap_or_else(|| Number::from(0))
    }
}

/// GET /dashboard/count
async fn item_count(
    State(state): State<AppState>,
    _access: ItemAccess,
) -> ApiResult<Json<CountResponse>> {
    let count = state.store().count_items().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /dashboard/low
async fn low_stock(
    State(state): State<AppState>,
    _access: ItemAccess,
    Query(params): Query<LowStockParams>,
) -> ApiResult<Json<LowStockResponse>> {
    let min = threshold(&params, state.config().min_quantity);
    let low_count = state.store().count_items_below(min).await?;
    Ok(Json(LowStockResponse {
        low_count,
        min: threshold_number(min),
    }))
}

/// Build dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/count", get(item_count))
        .route("/dashboard/low", get(low_stock))
}
