//! Narrative Adapter
//!
//! Condenses the window into a small summary, asks the provider for a
//! narrative once, and isolates every failure behind a fallback string.

use super::{NarrativeError, NarrativeRequest, NarrativeService};
use crate::insights::ConditionDistribution;
use crate::storage::WeatherObservation;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Returned in place of a narrative whenever generation fails
pub const NARRATIVE_FALLBACK: &str = "Unable to generate AI insights at this time.";

const SYSTEM_INSTRUCTION: &str =
    "You are a meteorologist. Provide a brief, useful summary of the weather data.";

/// Compact window summary sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSummary {
    /// City of the most recent observation
    pub city: String,
    pub records: usize,
    /// Unrounded mean temperature
    pub avg_temp: f64,
    /// Distinct condition labels in first-seen order
    pub conditions: Vec<String>,
}

impl NarrativeSummary {
    /// Summarize a newest-first window. `None` when the window is empty.
    pub fn from_observations(observations: &[WeatherObservation]) -> Option<Self> {
        let newest = observations.first()?;

        let conditions =
            ConditionDistribution::from_labels(observations.iter().map(|o| o.condition.as_str()))
                .labels()
                .map(str::to_string)
                .collect();

        Some(Self {
            city: newest.city.clone(),
            records: observations.len(),
            avg_temp: observations.iter().map(|o| o.temperature).sum::<f64>()
                / observations.len() as f64,
            conditions,
        })
    }

    /// Provider request with this summary JSON-encoded into the user prompt
    pub fn to_request(&self) -> Result<NarrativeRequest, NarrativeError> {
        let encoded =
            serde_json::to_string(self).map_err(|e| NarrativeError::Malformed(e.to_string()))?;

        Ok(NarrativeRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt: format!(
                "Analyze this weather data and give useful insights in 2-3 sentences: {}",
                encoded
            ),
        })
    }
}

/// Failure-isolating wrapper around a narrative provider
#[derive(Clone)]
pub struct NarrativeAdapter {
    service: Arc<dyn NarrativeService>,
    timeout: Duration,
}

impl NarrativeAdapter {
    /// Create an adapter; `timeout` bounds the single upstream call
    pub fn new(service: Arc<dyn NarrativeService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Produce a narrative for the window.
    ///
    /// Never fails: any provider error, timeout, or empty answer yields
    /// `NARRATIVE_FALLBACK`.
    pub async fn narrate(&self, observations: &[WeatherObservation]) -> String {
        match self.try_narrate(observations).await {
            Ok(text) => {
                tracing::debug!(chars = text.len(), "Narrative generated");
                text
            }
            Err(e) => {
                tracing::warn!(error = %e, "Narrative generation failed, using fallback");
                NARRATIVE_FALLBACK.to_string()
            }
        }
    }

    async fn try_narrate(&self, observations: &[WeatherObservation]) -> Result<String, NarrativeError> {
        let summary = NarrativeSummary::from_observations(observations)
            .ok_or_else(|| NarrativeError::Malformed("empty observation window".to_string()))?;
        let request = summary.to_request()?;

        let text = tokio::time::timeout(self.timeout, self.service.summarize(&request))
            .await
            .map_err(|_| NarrativeError::Timeout)??;

        let text = text.trim();
        if text.is_empty() {
            return Err(NarrativeError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
