//! Stats Routes
//!
//! - GET /api/v1/weather/stats - Per-city aggregates

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CityParams, DataResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::storage::CityStats;

/// GET /api/v1/weather/stats
///
/// Aggregates for every city, or for one city when `?city=` is given.
pub async fn city_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CityParams>,
) -> ApiResult<Json<DataResponse<Vec<CityStats>>>> {
    let stats = state.store.city_stats(params.city()).await?;
    Ok(Json(DataResponse::new(stats)))
}
