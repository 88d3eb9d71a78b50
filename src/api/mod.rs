//! Nimbus REST API
//!
//! HTTP API layer for Nimbus, built with Axum.
//!
//! # Endpoints
//!
//! ## Observations
//! - `POST /api/v1/weather/logs` - Store an observation
//! - `GET /api/v1/weather/logs` - List observations (`city`, `start_date`, `end_date`, `limit`, `offset`)
//! - `GET /api/v1/weather/logs/:id` - Get one observation
//!
//! ## Analysis
//! - `GET /api/v1/weather/stats` - Per-city aggregates
//! - `GET /api/v1/weather/insights` - Insights report for the last seven days
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use nimbus::api::{serve, AppState};
//! use nimbus::config::ApiConfig;
//! use nimbus::storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::with_store(Arc::new(InMemoryStore::new()));
//!     serve(state, &ApiConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/weather/logs", post(routes::logs::create_log))
        .route("/weather/logs", get(routes::logs::list_logs))
        .route("/weather/logs/:id", get(routes::logs::get_log))
        .route("/weather/stats", get(routes::stats::city_stats))
        .route("/weather/insights", get(routes::insights::get_insights));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Nimbus API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Nimbus API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{FixedClock, InsightEngine};
    use crate::narrative::fakes::FailingNarrator;
    use crate::narrative::{NarrativeAdapter, NARRATIVE_FALLBACK};
    use crate::storage::{InMemoryStore, RecordStore, WeatherObservation};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn seeded_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::with_observations(vec![
            WeatherObservation::new("Recife", "BR", 31.0, now() - Duration::hours(1)).humidity(85.0),
            WeatherObservation::new("Recife", "BR", 32.0, now() - Duration::hours(4)).humidity(82.0),
            WeatherObservation::new("Curitiba", "BR", 12.0, now() - Duration::hours(2))
                .condition("Clouds", "broken clouds"),
            WeatherObservation::new("Curitiba", "BR", 14.0, now() - Duration::days(9)),
        ]))
    }

    fn create_test_app(store: Arc<InMemoryStore>) -> Router {
        let store: Arc<dyn RecordStore> = store;
        let engine = InsightEngine::new(Arc::clone(&store)).with_clock(Arc::new(FixedClock(now())));
        build_router(AppState::new(store, engine, ApiConfig::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app(seeded_store());

        let (status, _) = get_json(app.clone(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["records"], 4);
        assert_eq!(body["narrative_enabled"], false);
    }

    #[tokio::test]
    async fn test_create_log() {
        let store = seeded_store();
        let app = create_test_app(Arc::clone(&store));
        let observation = WeatherObservation::new("Natal", "BR", 29.0, now());

        let (status, body) = post_json(
            app,
            "/api/v1/weather/logs",
            serde_json::to_string(&observation).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Weather log created successfully");
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_create_invalid_log() {
        let app = create_test_app(seeded_store());
        let observation = WeatherObservation::new("", "BR", 29.0, now()).humidity(140.0);

        let (status, body) = post_json(
            app,
            "/api/v1/weather/logs",
            serde_json::to_string(&observation).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let app = create_test_app(seeded_store());
        let (status, _) = post_json(app, "/api/v1/weather/logs", "not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_logs_filters_and_pages() {
        let app = create_test_app(seeded_store());

        let (status, body) = get_json(app.clone(), "/api/v1/weather/logs?city=rec&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["meta"]["limit"], 1);
        assert_eq!(body["meta"]["offset"], 0);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["temperature"], 31.0);

        let (_, body) = get_json(app.clone(), "/api/v1/weather/logs?start_date=2024-06-05").await;
        assert_eq!(body["meta"]["total"], 3);
        assert_eq!(body["meta"]["limit"], 100);

        let (status, _) = get_json(app, "/api/v1/weather/logs?end_date=soon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_logs_rejects_zero_limit() {
        let app = create_test_app(seeded_store());

        let (status, body) = get_json(app, "/api/v1/weather/logs?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_log() {
        let store = seeded_store();
        let app = create_test_app(Arc::clone(&store));
        let id = store
            .insert(WeatherObservation::new("Belem", "BR", 27.0, now()))
            .await
            .unwrap();

        let (status, body) = get_json(app.clone(), &format!("/api/v1/weather/logs/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["city"], "Belem");
        assert_eq!(body["data"]["id"], id.to_string());

        let (status, _) = get_json(app.clone(), &format!("/api/v1/weather/logs/{}", uuid::Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app, "/api/v1/weather/logs/not-an-id").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats() {
        let app = create_test_app(seeded_store());

        let (status, body) = get_json(app.clone(), "/api/v1/weather/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["city"], "Curitiba");

        let (_, body) = get_json(app, "/api/v1/weather/stats?city=Recife").await;
        assert_eq!(body["data"][0]["total_records"], 2);
        assert_eq!(body["data"][0]["avg_temperature"], 31.5);
    }

    #[tokio::test]
    async fn test_insights_report() {
        let app = create_test_app(seeded_store());

        let (status, body) = get_json(app, "/api/v1/weather/insights?city=Recife").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        assert_eq!(data["period"]["totalRecords"], 2);
        assert_eq!(data["statistics"]["temperature"]["avg"], 31.5);
        assert_eq!(data["insights"].as_array().unwrap().len(), 2);
        assert!(data.get("aiSummary").is_none());
    }

    #[tokio::test]
    async fn test_insights_no_data() {
        let app = create_test_app(seeded_store());

        let (status, body) = get_json(app, "/api/v1/weather/insights?city=Manaus").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            serde_json::json!({"message": "No data available for insights", "insights": []})
        );
    }

    #[tokio::test]
    async fn test_insights_survive_narrative_failure() {
        let store: Arc<dyn RecordStore> = seeded_store();
        let engine = InsightEngine::new(Arc::clone(&store))
            .with_clock(Arc::new(FixedClock(now())))
            .with_narrator(NarrativeAdapter::new(
                Arc::new(FailingNarrator),
                std::time::Duration::from_secs(1),
            ));
        let app = build_router(AppState::new(store, engine, ApiConfig::default()));

        let (status, body) = get_json(app, "/api/v1/weather/insights").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["aiSummary"], NARRATIVE_FALLBACK);
        assert_eq!(body["data"]["period"]["totalRecords"], 3);
    }
}
