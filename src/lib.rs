//! # Nimbus
//!
//! Weather insights service: stores periodic weather observations and, on
//! demand, turns the last seven days of them into an insights report.
//!
//! ## Features
//!
//! - **Statistics**: per-metric averages and ranges with fixed rounding
//! - **Condition summary**: frequency distribution with a stable tie-break
//! - **Trend detection**: recent-half vs older-half mean temperature
//! - **Advisories**: fixed-threshold rule table
//! - **Narrative**: optional AI summary that never fails the report
//!
//! ## Modules
//!
//! - [`storage`]: Observation model, record store, file import
//! - [`insights`]: Analysis pipeline and report assembly
//! - [`narrative`]: Text-generation provider and failure-isolating adapter
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nimbus::insights::InsightEngine;
//! use nimbus::storage::{InMemoryStore, RecordStore, WeatherObservation};
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new());
//!     store
//!         .insert(WeatherObservation::new("Lisbon", "PT", 31.5, Utc::now()).humidity(25.0))
//!         .await?;
//!
//!     let engine = InsightEngine::new(store);
//!     let outcome = engine.generate_insights(Some("Lisbon")).await?;
//!
//!     for insight in outcome.insights() {
//!         println!("{}", insight);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod insights;
pub mod logging;
pub mod narrative;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    CityStats, InMemoryStore, ObservationQuery, ObservationRecord, RecordStore, StorageError,
    StorageResult, StoreConfig, WeatherObservation,
};

pub use insights::{
    Clock, FixedClock, InsightEngine, InsightError, InsightsOutcome, InsightsReport, SystemClock,
    TrendSignal,
};

pub use narrative::{
    NarrativeAdapter, NarrativeConfig, NarrativeError, NarrativeService, OpenAiClient,
    NARRATIVE_FALLBACK,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, NarrativeSettings};
