//! Core data types for the observation store
//!
//! This module defines the fundamental types used throughout the storage layer:
//! - `WeatherObservation`: A single reading collected for a city
//! - `ObservationRecord`: An observation together with its store-assigned ID
//! - `ObservationQuery`: Filter, window, and paging for reads
//! - `CityStats`: Per-city aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted temperature range in °C. Anything outside is a sensor or unit error.
pub const TEMPERATURE_RANGE: (f64, f64) = (-100.0, 60.0);

/// A single weather observation
///
/// Field names follow the ingestion payload (snake_case). Observations are
/// immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub city: String,
    pub country: String,
    /// Air temperature in °C
    pub temperature: f64,
    /// Apparent temperature in °C
    pub feels_like: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
    /// Pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Cloud cover, 0-100
    pub clouds: f64,
    /// Visibility in meters
    pub visibility: f64,
    /// Short condition label (e.g. "Clouds", "Rain")
    pub condition: String,
    pub condition_description: String,
    pub icon: String,
    /// Rain volume for the last hour in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_1h: Option<f64>,
    /// Snow volume for the last hour in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_1h: Option<f64>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// When the reading was taken; ordering and window key
    pub collected_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Create an observation with the required identity, temperature and timestamp.
    ///
    /// Remaining measurements start at neutral values (humidity 50, calm,
    /// clear sky) and are set with the builder methods.
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        temperature: f64,
        collected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            temperature,
            feels_like: temperature,
            humidity: 50.0,
            pressure: 1013.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            clouds: 0.0,
            visibility: 10_000.0,
            condition: "Clear".to_string(),
            condition_description: "clear sky".to_string(),
            icon: "01d".to_string(),
            rain_1h: None,
            snow_1h: None,
            sunrise: collected_at,
            sunset: collected_at,
            collected_at,
        }
    }

    /// Builder method: set humidity
    pub fn humidity(mut self, humidity: f64) -> Self {
        self.humidity = humidity;
        self
    }

    /// Builder method: set wind speed
    pub fn wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = wind_speed;
        self
    }

    /// Builder method: set the condition label and description
    pub fn condition(mut self, condition: impl Into<String>, description: impl Into<String>) -> Self {
        self.condition = condition.into();
        self.condition_description = description.into();
        self
    }

    /// Check the observation against ingestion rules.
    ///
    /// Returns every violation found; an empty list means the observation is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.city.trim().is_empty() {
            errors.push("city is required".to_string());
        }
        if self.country.trim().is_empty() {
            errors.push("country is required".to_string());
        }

        let numeric = [
            ("temperature", self.temperature),
            ("feels_like", self.feels_like),
            ("humidity", self.humidity),
            ("pressure", self.pressure),
            ("wind_speed", self.wind_speed),
            ("wind_direction", self.wind_direction),
            ("clouds", self.clouds),
            ("visibility", self.visibility),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                errors.push(format!("{} must be a finite number", name));
            }
        }

        let (min_temp, max_temp) = TEMPERATURE_RANGE;
        if self.temperature < min_temp || self.temperature > max_temp {
            errors.push(format!(
                "temperature out of valid range ({} to {})",
                min_temp, max_temp
            ));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            errors.push("humidity must be between 0 and 100".to_string());
        }
        if !(0.0..=100.0).contains(&self.clouds) {
            errors.push("clouds must be between 0 and 100".to_string());
        }
        if self.wind_speed < 0.0 {
            errors.push("wind_speed must not be negative".to_string());
        }

        errors
    }
}

/// A stored observation with its identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub observation: WeatherObservation,
}

impl ObservationRecord {
    pub fn new(observation: WeatherObservation) -> Self {
        Self {
            id: Uuid::new_v4(),
            observation,
        }
    }
}

/// How the city filter matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityFilter {
    /// Exact, case-sensitive match
    Exact(String),
    /// Case-insensitive substring match
    Contains(String),
}

impl CityFilter {
    pub fn matches(&self, city: &str) -> bool {
        match self {
            CityFilter::Exact(expected) => city == expected,
            CityFilter::Contains(needle) => city.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Read filter for the observation store
///
/// Results are always sorted by `collected_at` descending. `offset` and
/// `limit` apply after sorting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationQuery {
    pub city: Option<CityFilter>,
    /// Inclusive lower bound on `collected_at`
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `collected_at`
    pub until: Option<DateTime<Utc>>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ObservationQuery {
    /// Query matching every observation
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder method: exact city match (skipped when `None`)
    pub fn city(mut self, city: Option<&str>) -> Self {
        self.city = city.map(|c| CityFilter::Exact(c.to_string()));
        self
    }

    /// Builder method: case-insensitive substring city match (skipped when `None`)
    pub fn city_contains(mut self, city: Option<&str>) -> Self {
        self.city = city.map(|c| CityFilter::Contains(c.to_string()));
        self
    }

    /// Builder method: inclusive lower bound
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Builder method: inclusive upper bound
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Builder method: paging
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Check the filter part of the query (paging is applied by the store)
    pub fn matches(&self, observation: &WeatherObservation) -> bool {
        if let Some(filter) = &self.city {
            if !filter.matches(&observation.city) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if observation.collected_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if observation.collected_at > until {
                return false;
            }
        }
        true
    }
}

/// Aggregates for one city across its stored observations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityStats {
    pub city: String,
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub total_records: usize,
    pub last_collected: DateTime<Utc>,
}
