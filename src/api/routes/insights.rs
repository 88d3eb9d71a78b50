//! Insight Routes
//!
//! - GET /api/v1/weather/insights - Insights report for the last seven days

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CityParams, DataResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::insights::InsightsOutcome;

/// GET /api/v1/weather/insights
///
/// Either the full report or the no-data shape; narrative failures never
/// fail the request.
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CityParams>,
) -> ApiResult<Json<DataResponse<InsightsOutcome>>> {
    let outcome = state.engine.generate_insights(params.city()).await?;
    Ok(Json(DataResponse::new(outcome)))
}
