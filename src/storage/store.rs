//! Observation Store
//!
//! The `RecordStore` trait is the read/write seam between the insights
//! engine and whatever holds the observations. `InMemoryStore` is the
//! bundled implementation: a sorted-on-read `Vec` behind Tokio's async
//! RwLock, optionally mirrored to a JSON snapshot file.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{CityStats, ObservationQuery, ObservationRecord, WeatherObservation};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage backend for weather observations
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validate and store an observation, returning its new ID
    async fn insert(&self, observation: WeatherObservation) -> StorageResult<Uuid>;

    /// Fetch matching observations sorted by `collected_at` descending
    async fn find(&self, query: &ObservationQuery) -> StorageResult<Vec<ObservationRecord>>;

    /// Count matching observations, ignoring paging
    async fn count(&self, query: &ObservationQuery) -> StorageResult<usize>;

    /// Fetch a single observation by ID
    async fn get(&self, id: Uuid) -> StorageResult<Option<ObservationRecord>>;

    /// Per-city aggregates, optionally restricted to one city (exact match)
    async fn city_stats(&self, city: Option<&str>) -> StorageResult<Vec<CityStats>> {
        let records = self.find(&ObservationQuery::all().city(city)).await?;
        Ok(aggregate_by_city(&records))
    }
}

/// Configuration for the in-memory store
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// JSON file loaded at open and rewritten after every insert
    pub snapshot_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(snapshot_path.into()),
        }
    }
}

/// In-memory observation store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<ObservationRecord>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// Create an empty store without a snapshot file
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store, loading the snapshot file if one is configured and present
    pub fn open(config: StoreConfig) -> StorageResult<Self> {
        let records = match &config.snapshot_path {
            Some(path) => load_snapshot(path)?,
            None => Vec::new(),
        };

        tracing::info!(
            records = records.len(),
            snapshot = ?config.snapshot_path,
            "Observation store opened"
        );

        Ok(Self {
            records: RwLock::new(records),
            snapshot_path: config.snapshot_path,
        })
    }

    /// Bulk-load trusted observations without validation
    pub fn with_observations(observations: impl IntoIterator<Item = WeatherObservation>) -> Self {
        let records = observations.into_iter().map(ObservationRecord::new).collect();
        Self {
            records: RwLock::new(records),
            snapshot_path: None,
        }
    }

    /// Number of stored observations
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Matching records, newest first. Ties keep insertion order.
    fn select(records: &[ObservationRecord], query: &ObservationQuery) -> Vec<ObservationRecord> {
        let mut matched: Vec<ObservationRecord> = records
            .iter()
            .filter(|r| query.matches(&r.observation))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.observation.collected_at.cmp(&a.observation.collected_at));
        matched
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, observation: WeatherObservation) -> StorageResult<Uuid> {
        let errors = observation.validate();
        if !errors.is_empty() {
            return Err(StorageError::Validation(errors));
        }

        let record = ObservationRecord::new(observation);
        let id = record.id;

        let mut records = self.records.write().await;
        records.push(record);

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = save_snapshot(path, &records).await {
                // the failed insert must leave no trace in memory
                records.pop();
                tracing::error!(error = %e, snapshot = ?path, "Snapshot write failed, insert rolled back");
                return Err(e);
            }
        }

        tracing::debug!(id = %id, total = records.len(), "Observation stored");
        Ok(id)
    }

    async fn find(&self, query: &ObservationQuery) -> StorageResult<Vec<ObservationRecord>> {
        let records = self.records.read().await;
        let matched = Self::select(&records, query);

        let page = matched.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        })
    }

    async fn count(&self, query: &ObservationQuery) -> StorageResult<usize> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| query.matches(&r.observation)).count())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<ObservationRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}

/// Load snapshot records from a JSON file (missing file = empty store).
///
/// Records failing ingestion validation are skipped with a warning.
fn load_snapshot(path: &Path) -> StorageResult<Vec<ObservationRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let records: Vec<ObservationRecord> = serde_json::from_str(&content)?;

    let total = records.len();
    let valid: Vec<ObservationRecord> = records
        .into_iter()
        .filter(|record| {
            let problems = record.observation.validate();
            if !problems.is_empty() {
                tracing::warn!(
                    id = %record.id,
                    problems = %problems.join("; "),
                    "Skipping invalid snapshot record"
                );
            }
            problems.is_empty()
        })
        .collect();

    if valid.len() < total {
        tracing::warn!(skipped = total - valid.len(), snapshot = ?path, "Snapshot contained invalid records");
    }
    Ok(valid)
}

/// Rewrite the snapshot file with the full record set
async fn save_snapshot(path: &Path, records: &[ObservationRecord]) -> StorageResult<()> {
    let content = serde_json::to_string(records)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Group records by city and compute aggregates. Output is sorted by city name.
pub fn aggregate_by_city(records: &[ObservationRecord]) -> Vec<CityStats> {
    let mut groups: BTreeMap<&str, Vec<&WeatherObservation>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.observation.city.as_str())
            .or_default()
            .push(&record.observation);
    }

    groups
        .into_iter()
        .filter_map(|(city, observations)| {
            let count = observations.len() as f64;
            let last_collected = observations.iter().map(|o| o.collected_at).max()?;

            Some(CityStats {
                city: city.to_string(),
                avg_temperature: observations.iter().map(|o| o.temperature).sum::<f64>() / count,
                min_temperature: observations
                    .iter()
                    .map(|o| o.temperature)
                    .fold(f64::INFINITY, f64::min),
                max_temperature: observations
                    .iter()
                    .map(|o| o.temperature)
                    .fold(f64::NEG_INFINITY, f64::max),
                avg_humidity: observations.iter().map(|o| o.humidity).sum::<f64>() / count,
                avg_wind_speed: observations.iter().map(|o| o.wind_speed).sum::<f64>() / count,
                total_records: observations.len(),
                last_collected,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::tempdir;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn obs(city: &str, temp: f64, collected_at: DateTime<Utc>) -> WeatherObservation {
        WeatherObservation::new(city, "BR", temp, collected_at)
    }

    #[tokio::test]
    async fn test_find_sorts_descending() {
        let store = InMemoryStore::new();
        store.insert(obs("Recife", 27.0, at(1, 8))).await.unwrap();
        store.insert(obs("Recife", 29.0, at(3, 8))).await.unwrap();
        store.insert(obs("Recife", 28.0, at(2, 8))).await.unwrap();

        let found = store.find(&ObservationQuery::all()).await.unwrap();
        let times: Vec<_> = found.iter().map(|r| r.observation.collected_at).collect();
        assert_eq!(times, vec![at(3, 8), at(2, 8), at(1, 8)]);
    }

    #[tokio::test]
    async fn test_find_filters_city_and_window() {
        let store = InMemoryStore::new();
        store.insert(obs("Recife", 27.0, at(1, 8))).await.unwrap();
        store.insert(obs("Recife", 29.0, at(5, 8))).await.unwrap();
        store.insert(obs("Natal", 30.0, at(5, 9))).await.unwrap();

        let query = ObservationQuery::all().city(Some("Recife")).since(at(2, 0));
        let found = store.find(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].observation.temperature, 29.0);

        let query = ObservationQuery::all().city_contains(Some("REC"));
        assert_eq!(store.count(&query).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_paging_applies_after_sort() {
        let store = InMemoryStore::new();
        for day in 1..=5 {
            store.insert(obs("Recife", day as f64, at(day, 8))).await.unwrap();
        }

        let page = store.find(&ObservationQuery::all().page(1, 2)).await.unwrap();
        let temps: Vec<f64> = page.iter().map(|r| r.observation.temperature).collect();
        assert_eq!(temps, vec![4.0, 3.0]);

        let total = store.count(&ObservationQuery::all().page(1, 2)).await.unwrap();
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid() {
        let store = InMemoryStore::new();
        let err = store
            .insert(obs("", 20.0, at(1, 8)).humidity(-5.0))
            .await
            .unwrap_err();

        match err {
            StorageError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = InMemoryStore::new();
        let id = store.insert(obs("Recife", 27.0, at(1, 8))).await.unwrap();

        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.observation.city, "Recife");
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("observations.json");

        {
            let store = InMemoryStore::open(StoreConfig::new(&path)).unwrap();
            store.insert(obs("Recife", 27.0, at(1, 8))).await.unwrap();
            store.insert(obs("Natal", 31.0, at(1, 9))).await.unwrap();
        }

        let reopened = InMemoryStore::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(reopened.len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_rolls_back_insert() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        // parent of the snapshot is a regular file, so the write must fail
        let store = InMemoryStore::open(StoreConfig::new(blocker.join("observations.json"))).unwrap();
        let result = store.insert(obs("Recife", 27.0, at(1, 8))).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(store.is_empty().await);
        assert!(store.find(&ObservationQuery::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_skips_invalid_snapshot_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("observations.json");

        let good = ObservationRecord::new(obs("Recife", 27.0, at(1, 8)));
        let humid = ObservationRecord::new(obs("Recife", 27.0, at(1, 9)).humidity(140.0));
        let scorching = ObservationRecord::new(obs("Natal", 95.0, at(1, 10)));
        std::fs::write(&path, serde_json::to_string(&vec![good.clone(), humid, scorching]).unwrap()).unwrap();

        let store = InMemoryStore::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(good.id).await.unwrap(), Some(good));
    }

    #[tokio::test]
    async fn test_city_stats() {
        let store = InMemoryStore::new();
        store.insert(obs("Recife", 26.0, at(1, 8)).humidity(70.0)).await.unwrap();
        store.insert(obs("Recife", 30.0, at(2, 8)).humidity(80.0)).await.unwrap();
        store.insert(obs("Natal", 31.0, at(1, 9)).wind_speed(6.0)).await.unwrap();

        let stats = store.city_stats(None).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].city, "Natal");
        assert_eq!(stats[1].city, "Recife");
        assert_eq!(stats[1].avg_temperature, 28.0);
        assert_eq!(stats[1].min_temperature, 26.0);
        assert_eq!(stats[1].max_temperature, 30.0);
        assert_eq!(stats[1].avg_humidity, 75.0);
        assert_eq!(stats[1].total_records, 2);
        assert_eq!(stats[1].last_collected, at(2, 8));

        let only_natal = store.city_stats(Some("Natal")).await.unwrap();
        assert_eq!(only_natal.len(), 1);
        assert_eq!(only_natal[0].avg_wind_speed, 6.0);
    }
}
