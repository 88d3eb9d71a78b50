//! Statistical Analyzer
//!
//! Per-metric aggregates and the condition frequency distribution over a
//! non-empty observation set.

use crate::insights::engine::InsightError;
use crate::storage::WeatherObservation;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Exact aggregates of one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStats {
    /// Arithmetic mean over every observation, unrounded
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    /// Aggregate a sequence of values. `None` when the sequence is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        (count > 0).then(|| Self {
            mean: sum / count as f64,
            min,
            max,
        })
    }

    /// Report form: mean rounded to `decimals` places, min/max exact.
    ///
    /// The rounded mean is kept inside `[min, max]` so the summary never
    /// reports an average outside the observed range.
    pub fn summary(&self, decimals: i32) -> MetricSummary {
        MetricSummary {
            avg: round_half_up(self.mean, decimals).clamp(self.min, self.max),
            min: self.min,
            max: self.max,
        }
    }
}

/// Report form of one metric
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MetricSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Round half toward positive infinity (2.25 -> 2.3, -2.25 -> -2.2)
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Occurrences of one condition label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCount {
    pub condition: String,
    pub count: usize,
}

/// Condition label -> occurrence count, kept in first-seen order
///
/// Iteration order is the order in which each label first appeared in the
/// input. `most_common` relies on it to break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionDistribution {
    entries: Vec<ConditionCount>,
}

impl ConditionDistribution {
    /// Count labels in input order
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<ConditionCount> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();

        for label in labels {
            match positions.get(label) {
                Some(&idx) => entries[idx].count += 1,
                None => {
                    positions.insert(label, entries.len());
                    entries.push(ConditionCount {
                        condition: label.to_string(),
                        count: 1,
                    });
                }
            }
        }

        Self { entries }
    }

    /// Label with the highest count. On a tie the label seen first wins.
    pub fn most_common(&self) -> Option<&str> {
        let mut best: Option<&ConditionCount> = None;
        for entry in &self.entries {
            // strictly greater: an equal count never displaces an earlier label
            if best.map_or(true, |b| entry.count > b.count) {
                best = Some(entry);
            }
        }
        best.map(|e| e.condition.as_str())
    }

    pub fn get(&self, condition: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.condition == condition)
            .map(|e| e.count)
    }

    /// Sum of all counts (equals the number of observations counted)
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Distinct labels in first-seen order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.condition.as_str())
    }
}

impl Serialize for ConditionDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.condition, &entry.count)?;
        }
        map.end()
    }
}

/// Everything the analyzer derives from an observation set
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub temperature: MetricStats,
    pub humidity: MetricStats,
    pub wind_speed: MetricStats,
    pub conditions: ConditionDistribution,
    pub most_common_condition: String,
}

/// Analyze a non-empty observation set.
///
/// Fails with `InsightError::EmptyInput` on an empty slice; callers are
/// expected to short-circuit the empty window before getting here.
pub fn analyze(observations: &[WeatherObservation]) -> Result<Analysis, InsightError> {
    let temperature = MetricStats::from_values(observations.iter().map(|o| o.temperature))
        .ok_or(InsightError::EmptyInput)?;
    let humidity = MetricStats::from_values(observations.iter().map(|o| o.humidity))
        .ok_or(InsightError::EmptyInput)?;
    let wind_speed = MetricStats::from_values(observations.iter().map(|o| o.wind_speed))
        .ok_or(InsightError::EmptyInput)?;

    let conditions = ConditionDistribution::from_labels(observations.iter().map(|o| o.condition.as_str()));
    let most_common_condition = conditions
        .most_common()
        .ok_or(InsightError::EmptyInput)?
        .to_string();

    Ok(Analysis {
        temperature,
        humidity,
        wind_speed,
        conditions,
        most_common_condition,
    })
}
