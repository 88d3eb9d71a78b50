//! Trend Detector
//!
//! Splits a newest-first observation set in two and compares the mean
//! temperature of the recent half against the older half.

use crate::insights::policy::{TREND_DELTA, TREND_MIN_OBSERVATIONS};
use crate::storage::WeatherObservation;
use serde::Serialize;

/// Directional temperature change across the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Warming,
    Cooling,
    Stable,
}

impl std::fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSignal::Warming => write!(f, "warming"),
            TrendSignal::Cooling => write!(f, "cooling"),
            TrendSignal::Stable => write!(f, "stable"),
        }
    }
}

/// Half-window means behind a trend signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    pub recent_avg: f64,
    pub older_avg: f64,
    pub signal: TrendSignal,
}

impl TrendAnalysis {
    pub fn delta(&self) -> f64 {
        self.recent_avg - self.older_avg
    }
}

/// Classify a difference of means against the trend threshold
pub fn classify(delta: f64) -> TrendSignal {
    if delta > TREND_DELTA {
        TrendSignal::Warming
    } else if delta < -TREND_DELTA {
        TrendSignal::Cooling
    } else {
        TrendSignal::Stable
    }
}

/// Detect the temperature trend of a set sorted by `collected_at` descending.
///
/// The first `ceil(n / 2)` observations form the recent half. Returns
/// `None` for fewer than two observations.
pub fn detect_trend(observations: &[WeatherObservation]) -> Option<TrendAnalysis> {
    if observations.len() < TREND_MIN_OBSERVATIONS {
        return None;
    }

    let split = observations.len().div_ceil(2);
    let (recent, older) = observations.split_at(split);

    let recent_avg = mean_temperature(recent);
    let older_avg = mean_temperature(older);

    Some(TrendAnalysis {
        recent_avg,
        older_avg,
        signal: classify(recent_avg - older_avg),
    })
}

fn mean_temperature(observations: &[WeatherObservation]) -> f64 {
    observations.iter().map(|o| o.temperature).sum::<f64>() / observations.len() as f64
}
