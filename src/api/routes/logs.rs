//! Observation Routes
//!
//! - POST /api/v1/weather/logs - Store an observation
//! - GET /api/v1/weather/logs - List observations, newest first
//! - GET /api/v1/weather/logs/:id - Get one observation

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{parse_date_param, CreatedResponse, DataResponse, ListMeta, ListParams, ListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::{ObservationQuery, ObservationRecord, WeatherObservation};

/// POST /api/v1/weather/logs
///
/// Validate and store one observation.
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    Json(observation): Json<WeatherObservation>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let city = observation.city.clone();
    let id = state.store.insert(observation).await?;

    tracing::debug!(id = %id, city = %city, "Observation stored");

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id))))
}

/// GET /api/v1/weather/logs
///
/// List observations matching the filters, newest first.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse<ObservationRecord>>> {
    let limit = params.limit.unwrap_or(state.config.default_limit);
    if limit < 1 {
        return Err(ApiError::Validation("limit must be at least 1".to_string()));
    }
    let offset = params.offset.unwrap_or(0);

    let mut query = ObservationQuery::all().city_contains(params.city.as_deref());
    if let Some(start) = &params.start_date {
        query = query.since(parse_date_param("start_date", start)?);
    }
    if let Some(end) = &params.end_date {
        query = query.until(parse_date_param("end_date", end)?);
    }

    let total = state.store.count(&query).await?;
    let data = state.store.find(&query.page(offset, limit)).await?;

    Ok(Json(ListResponse {
        success: true,
        data,
        meta: ListMeta {
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/weather/logs/:id
///
/// Get one observation by ID.
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<ObservationRecord>>> {
    let not_found = || ApiError::NotFound(format!("Weather log {} not found", id));

    let uuid = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let record = state.store.get(uuid).await?.ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(record)))
}
