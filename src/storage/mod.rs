//! Nimbus Observation Storage
//!
//! This module holds the weather observations the insights engine reads:
//!
//! - **types**: Core data structures (WeatherObservation, ObservationQuery, CityStats)
//! - **store**: The `RecordStore` trait and the bundled in-memory store
//! - **import**: JSON / CSV observation file import
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use nimbus::storage::{InMemoryStore, ObservationQuery, RecordStore, WeatherObservation};
//! use chrono::Utc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryStore::new();
//!
//!     store.insert(WeatherObservation::new("Lisbon", "PT", 21.5, Utc::now())).await?;
//!
//!     let query = ObservationQuery::all().city(Some("Lisbon"));
//!     let records = store.find(&query).await?;
//!
//!     println!("Found {} observations", records.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod import;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use import::{import_file, ImportResult};
pub use store::{aggregate_by_city, InMemoryStore, RecordStore, StoreConfig};
pub use types::{CityFilter, CityStats, ObservationQuery, ObservationRecord, WeatherObservation};
