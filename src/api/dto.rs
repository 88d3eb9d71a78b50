//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Every successful response carries `success: true`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

// ============================================
// OBSERVATION DTOs
// ============================================

/// POST /weather/logs response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: Uuid,
    pub message: String,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self {
            success: true,
            id,
            message: "Weather log created successfully".to_string(),
        }
    }
}

/// GET /weather/logs query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring match on the city
    #[serde(default)]
    pub city: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`, inclusive
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`, inclusive
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Paging metadata for list responses
#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// Single-payload response
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Optional `?city=` filter
#[derive(Debug, Default, Deserialize)]
pub struct CityParams {
    #[serde(default)]
    pub city: Option<String>,
}

impl CityParams {
    /// The city, with blank values treated as absent
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date_param(name: &str, value: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "{} must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{}'",
                name, value
            ))
        })
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Stored observation count
    pub records: usize,
    /// Whether insights reports carry an AI summary
    pub narrative_enabled: bool,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
