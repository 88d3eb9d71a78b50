//! Report types
//!
//! Serialized with camelCase keys. The two outcome shapes are distinct:
//! a full report carries `period` and `statistics`, the no-data shape
//! carries only `message` and an empty `insights` list.

use crate::insights::analyzer::{Analysis, ConditionDistribution, MetricSummary};
use crate::insights::engine::InsightError;
use crate::insights::rules::Insight;
use crate::storage::WeatherObservation;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Message of the no-data outcome
pub const NO_DATA_MESSAGE: &str = "No data available for insights";

/// Time span covered by a report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Oldest `collected_at` in the window
    pub start: DateTime<Utc>,
    /// Newest `collected_at` in the window
    pub end: DateTime<Utc>,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub temperature: MetricSummary,
    pub humidity: MetricSummary,
    pub wind_speed: MetricSummary,
}

/// Full insights report for a non-empty window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    pub period: Period,
    pub statistics: Statistics,
    pub most_common_condition: String,
    pub condition_distribution: ConditionDistribution,
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl InsightsReport {
    /// Assemble a report from a newest-first window and its analysis
    pub fn assemble(
        observations: &[WeatherObservation],
        analysis: Analysis,
        insights: &[Insight],
    ) -> Result<Self, InsightError> {
        let newest = observations.first().ok_or(InsightError::EmptyInput)?;
        let oldest = observations.last().ok_or(InsightError::EmptyInput)?;

        Ok(Self {
            period: Period {
                start: oldest.collected_at,
                end: newest.collected_at,
                total_records: observations.len(),
            },
            statistics: Statistics {
                temperature: analysis.temperature.summary(1),
                humidity: analysis.humidity.summary(0),
                wind_speed: analysis.wind_speed.summary(1),
            },
            most_common_condition: analysis.most_common_condition,
            condition_distribution: analysis.conditions,
            insights: insights.iter().map(|i| i.message().to_string()).collect(),
            ai_summary: None,
        })
    }
}

/// The degenerate outcome for an empty window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoDataReport {
    pub message: String,
    pub insights: Vec<String>,
}

impl Default for NoDataReport {
    fn default() -> Self {
        Self {
            message: NO_DATA_MESSAGE.to_string(),
            insights: Vec::new(),
        }
    }
}

/// Result of an insights request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsightsOutcome {
    Report(InsightsReport),
    NoData(NoDataReport),
}

impl InsightsOutcome {
    /// The full report, if the window had data
    pub fn report(&self) -> Option<&InsightsReport> {
        match self {
            InsightsOutcome::Report(report) => Some(report),
            InsightsOutcome::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, InsightsOutcome::NoData(_))
    }

    /// Insight messages (empty for the no-data outcome)
    pub fn insights(&self) -> &[String] {
        match self {
            InsightsOutcome::Report(report) => &report.insights,
            InsightsOutcome::NoData(no_data) => &no_data.insights,
        }
    }
}
