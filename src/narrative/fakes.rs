//! Deterministic narrative providers for tests

use super::{NarrativeError, NarrativeRequest, NarrativeService};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Always answers with the same text
pub struct FixedNarrator {
    text: String,
}

impl FixedNarrator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl NarrativeService for FixedNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(self.text.clone())
    }
}

/// Always fails as if the provider were down
pub struct FailingNarrator;

#[async_trait]
impl NarrativeService for FailingNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }
}

/// Answers only after a delay
pub struct SlowNarrator {
    delay: Duration,
}

impl SlowNarrator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl NarrativeService for SlowNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }
}

/// Records every request it receives
pub struct CountingNarrator {
    calls: AtomicUsize,
    fail: bool,
    last_request: Mutex<Option<NarrativeRequest>>,
}

impl CountingNarrator {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::succeeding()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<NarrativeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeService for CountingNarrator {
    async fn summarize(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.fail {
            Err(NarrativeError::Unavailable)
        } else {
            Ok("A steady week.".to_string())
        }
    }
}
