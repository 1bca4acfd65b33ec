//! Deterministic generator for tests and demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{AdvisoryError, TextGenerator};

#[derive(Debug)]
struct Step {
    delay: Duration,
    response: Result<String, String>,
}

/// Replays a fixed sequence of replies, one per call.
///
/// Each step may be delayed to imitate a slow model. Calls past the end of
/// the script fail.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Duration::ZERO, Ok(text.into()))
    }

    /// Queue a reply delivered after `delay`.
    pub fn reply_after(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(delay, Ok(text.into()))
    }

    /// Queue a failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Duration::ZERO, Err(message.into()))
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, delay: Duration, response: Result<String, String>) -> Self {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(Step { delay, response });
        }
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .map_err(|_| AdvisoryError::Generator("script lock poisoned".into()))?
            .pop_front()
            .ok_or_else(|| AdvisoryError::Generator("script exhausted".into()))?;

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.response.map_err(AdvisoryError::Generator)
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
