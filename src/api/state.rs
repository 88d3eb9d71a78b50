//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::ApiConfig;
use crate::insights::InsightEngine;
use crate::storage::RecordStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Observation store
    pub store: Arc<dyn RecordStore>,
    /// Insights engine reading from the same store
    pub engine: Arc<InsightEngine>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state around a store and an engine built on that store
    pub fn new(store: Arc<dyn RecordStore>, engine: InsightEngine, config: ApiConfig) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// State with a plain engine over `store` and default config
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let engine = InsightEngine::new(Arc::clone(&store));
        Self::new(store, engine, ApiConfig::default())
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if insights reports carry an AI summary
    pub fn narrative_enabled(&self) -> bool {
        self.engine.has_narrator()
    }
}
