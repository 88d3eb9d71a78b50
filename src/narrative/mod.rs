//! Narrative Augmentation
//!
//! Optional free-text commentary for an insights report, produced by an
//! external text-generation provider.
//!
//! ## Architecture
//!
//! - **NarrativeService**: the provider capability (`summarize(request) -> text`)
//! - **OpenAiClient**: OpenAI-compatible chat-completions implementation
//! - **NarrativeAdapter**: builds the prompt, bounds the call with a
//!   timeout, and turns every failure into a fixed fallback string
//!
//! The adapter makes exactly one upstream call per report. Errors never
//! leave the adapter.

mod adapter;
mod client;
#[cfg(test)]
pub(crate) mod fakes;

pub use adapter::{NarrativeAdapter, NarrativeSummary, NARRATIVE_FALLBACK};
pub use client::{NarrativeConfig, OpenAiClient};

use async_trait::async_trait;
use thiserror::Error;

/// A request to the narrative provider
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    /// Role/behaviour instruction for the model
    pub system_instruction: String,
    /// The user prompt, embedding the JSON-encoded window summary
    pub user_prompt: String,
}

/// Text-generation provider
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Generate narrative text for a request
    async fn summarize(&self, request: &NarrativeRequest) -> Result<String, NarrativeError>;
}

/// Errors that can occur when talking to a narrative provider
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative provider unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),
}
