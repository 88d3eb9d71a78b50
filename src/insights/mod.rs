//! Weather Insights
//!
//! Turns the trailing seven days of observations into an insights report.
//!
//! ## Pipeline
//!
//! 1. **engine**: fetch the window from a `RecordStore`, short-circuit when empty
//! 2. **analyzer**: per-metric aggregates and the condition distribution
//! 3. **trend**: recent-half vs older-half mean temperature
//! 4. **rules**: fixed-threshold advisories, in evaluation order
//! 5. **report**: assembly and the serialized shapes
//!
//! Steps 2-5 are pure functions of the fetched window. Thresholds live in
//! `policy`, and "now" comes from an injected `Clock`.
//!
//! # Example
//!
//! ```rust,no_run
//! use nimbus::insights::InsightEngine;
//! use nimbus::storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = InsightEngine::new(Arc::new(InMemoryStore::new()));
//!     let outcome = engine.generate_insights(Some("Lisbon")).await?;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod clock;
pub mod engine;
pub mod policy;
pub mod report;
pub mod rules;
pub mod trend;

pub use analyzer::{analyze, Analysis, ConditionDistribution, MetricStats, MetricSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{build_report, InsightEngine, InsightError};
pub use report::{InsightsOutcome, InsightsReport, NoDataReport, Period, Statistics, NO_DATA_MESSAGE};
pub use rules::{evaluate, Insight, RuleInputs};
pub use trend::{detect_trend, TrendAnalysis, TrendSignal};
