//! Nimbus API Server
//!
//! Run with: cargo run --bin nimbus-api
//!
//! # Configuration
//!
//! Read from `config.toml` (see `nimbus-cli config`), then overridden by:
//! - `NIMBUS_API_HOST` / `NIMBUS_API_PORT`: Bind address (default: 0.0.0.0:4000)
//! - `NIMBUS_SNAPSHOT_PATH`: JSON snapshot file (default: memory only)
//! - `OPENAI_API_KEY`: Enables the AI summary on insights reports
//! - `NIMBUS_NARRATIVE_URL` / `NIMBUS_NARRATIVE_MODEL` / `NIMBUS_NARRATIVE_TIMEOUT_MS`
//! - `RUST_LOG`: Log filter (default: nimbus=info,tower_http=debug)

use nimbus::api::{serve, AppState};
use nimbus::config::Config;
use nimbus::insights::InsightEngine;
use nimbus::storage::{InMemoryStore, RecordStore, StoreConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    nimbus::logging::init(&config.logging);

    tracing::info!("Starting Nimbus API server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the observation store
    let store_config = StoreConfig {
        snapshot_path: config.storage.snapshot_path.clone(),
    };
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::open(store_config)?);

    // Wire the insights engine, with narrative augmentation when a key is present
    let mut engine = InsightEngine::new(Arc::clone(&store));
    match config.narrative.adapter()? {
        Some(narrator) => {
            tracing::info!(
                url = %config.narrative.base_url,
                model = %config.narrative.model,
                "Narrative augmentation enabled"
            );
            engine = engine.with_narrator(narrator);
        }
        None => {
            tracing::info!("Narrative augmentation disabled (set OPENAI_API_KEY to enable)");
        }
    }

    let state = AppState::new(store, engine, config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Nimbus API server stopped");
    Ok(())
}
