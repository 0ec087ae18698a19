//! Handlers for the Prometheus-backed traffic analytics.
//!
//! Every endpoint degrades to `{ "data": [] }` when Prometheus is down.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::analytics::{self, RangeParams};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /analytics/requests
pub async fn request_rates(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end, step) = params.resolve();
    let series = state
        .prometheus
        .query_range(&analytics::requests_query(&params), start, end, step)
        .await;
    Ok(Json(DataResponse { data: series }))
}

/// GET /analytics/latency
pub async fn latency_percentiles(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end, step) = params.resolve();
    let series = state
        .prometheus
        .query_range(&analytics::latency_query(&params), start, end, step)
        .await;
    Ok(Json(DataResponse { data: series }))
}

/// GET /analytics/errors
pub async fn error_rates(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end, step) = params.resolve();
    let series = state
        .prometheus
        .query_range(&analytics::errors_query(&params), start, end, step)
        .await;
    Ok(Json(DataResponse { data: series }))
}
