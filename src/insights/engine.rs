//! Insight Engine
//!
//! Orchestrates one insights request: fetch the trailing window from the
//! record store, short-circuit an empty window, then run the analyzer,
//! trend detector and rule table, and finally attach the optional
//! narrative.

use crate::insights::analyzer::analyze;
use crate::insights::clock::{Clock, SystemClock};
use crate::insights::policy::WINDOW_DAYS;
use crate::insights::report::{InsightsOutcome, InsightsReport, NoDataReport};
use crate::insights::rules::{evaluate, RuleInputs};
use crate::insights::trend::detect_trend;
use crate::narrative::NarrativeAdapter;
use crate::storage::{ObservationQuery, RecordStore, StorageError, WeatherObservation};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Generates insights reports from stored observations
pub struct InsightEngine {
    store: Arc<dyn RecordStore>,
    narrator: Option<NarrativeAdapter>,
    clock: Arc<dyn Clock>,
}

impl InsightEngine {
    /// Create an engine on the system clock, without narrative augmentation
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            narrator: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Attach a narrative adapter
    pub fn with_narrator(mut self, narrator: NarrativeAdapter) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Replace the clock used to anchor the window
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn has_narrator(&self) -> bool {
        self.narrator.is_some()
    }

    /// Start of the observation window, recomputed on every call
    pub fn window_start(&self) -> DateTime<Utc> {
        self.clock.now() - Duration::days(WINDOW_DAYS)
    }

    /// Generate the insights report for one city, or for all cities.
    ///
    /// An empty window yields `InsightsOutcome::NoData`. Narrative failures
    /// never fail the request; they surface only as the fallback text in
    /// `ai_summary`.
    pub async fn generate_insights(&self, city: Option<&str>) -> Result<InsightsOutcome, InsightError> {
        let since = self.window_start();
        let query = ObservationQuery::all().city(city).since(since);

        let observations: Vec<WeatherObservation> = self
            .store
            .find(&query)
            .await?
            .into_iter()
            .map(|record| record.observation)
            .collect();

        if observations.is_empty() {
            tracing::info!(city = ?city, since = %since, "No observations in window");
            return Ok(InsightsOutcome::NoData(NoDataReport::default()));
        }

        let mut report = build_report(&observations)?;

        tracing::info!(
            city = ?city,
            records = observations.len(),
            insights = report.insights.len(),
            "Insights generated"
        );

        if let Some(narrator) = &self.narrator {
            report.ai_summary = Some(narrator.narrate(&observations).await);
        }

        Ok(InsightsOutcome::Report(report))
    }
}

/// Run the synchronous pipeline over a non-empty, newest-first window
pub fn build_report(observations: &[WeatherObservation]) -> Result<InsightsReport, InsightError> {
    let analysis = analyze(observations)?;
    let trend = detect_trend(observations);

    if let Some(trend) = &trend {
        tracing::debug!(
            recent_avg = trend.recent_avg,
            older_avg = trend.older_avg,
            signal = %trend.signal,
            "Trend detected"
        );
    }

    let insights = evaluate(&RuleInputs {
        avg_temperature: analysis.temperature.mean,
        avg_humidity: analysis.humidity.mean,
        avg_wind_speed: analysis.wind_speed.mean,
        trend: trend.map(|t| t.signal),
    });

    InsightsReport::assemble(observations, analysis, &insights)
}

/// Errors that can occur while generating insights
#[derive(Error, Debug)]
pub enum InsightError {
    /// The analyzer was handed an empty window
    #[error("Cannot analyze an empty observation set")]
    EmptyInput,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
