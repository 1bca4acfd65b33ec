//! Optional advisory text for a strategy comparison.
//!
//! The numeric engine never waits on this module. An [`AdvisoryEnricher`]
//! sends a compact summary of the debts and the comparison to a
//! [`TextGenerator`] and turns the reply into a handful of tips. Failures
//! and timeouts degrade to [`AdvisoryOutcome::Unavailable`]; replies that
//! arrive after a newer request was issued resolve to
//! [`AdvisoryOutcome::Stale`] so only the latest request is ever applied.
//!
//! # Backends
//!
//! - [`OllamaGenerator`]: HTTP client for an Ollama server, configured from
//!   `OLLAMA_HOST` and `OLLAMA_MODEL`.
//! - [`ScriptedGenerator`]: canned replies for tests and demos.

mod ollama;
pub mod parsing;
mod scripted;

pub use ollama::OllamaGenerator;
pub use scripted::ScriptedGenerator;

use crate::comparison::comparator::StrategyComparison;
use crate::core::debt_set::DebtSet;
use crate::policy::Strategy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why advisory text could not be produced.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed advisory response: {0}")]
    Malformed(String),

    #[error("text generator failed: {0}")]
    Generator(String),

    #[error("request superseded by a newer one")]
    Superseded,
}

/// External text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` and return the raw model output.
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;

    /// Model name, for logging.
    fn model(&self) -> &str;
}

/// Qualitative guidance attached to a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub tips: Vec<String>,
    pub priority: Option<String>,
    pub warning: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Result of one enrichment request.
#[derive(Debug)]
pub enum AdvisoryOutcome {
    Ready(Advisory),
    /// The generator failed twice or timed out; render without advice.
    Unavailable(AdvisoryError),
    /// A newer request was issued while this one was in flight.
    Stale,
}

impl AdvisoryOutcome {
    pub fn into_advisory(self) -> Option<Advisory> {
        match self {
            AdvisoryOutcome::Ready(advisory) => Some(advisory),
            AdvisoryOutcome::Unavailable(_) | AdvisoryOutcome::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, AdvisoryOutcome::Stale)
    }
}

/// Timeouts and retry policy for advisory requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryConfig {
    /// Upper bound on a single generator call.
    pub timeout: Duration,
    /// Pause before the retry.
    pub retry_backoff: Duration,
    /// Total attempts, first call included.
    pub max_attempts: u32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retry_backoff: Duration::from_millis(500),
            max_attempts: 2,
        }
    }
}

/// Compact view of the debts and the comparison sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtSummary {
    pub debt_count: usize,
    pub total_balance: Decimal,
    pub total_minimums: Decimal,
    pub monthly_budget: Decimal,
    pub highest_rate_percent: Decimal,
    pub recommended: Strategy,
    pub reasoning: String,
    pub strategies: Vec<StrategySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    /// `None` when the plan does not finish within the horizon.
    pub months: Option<u32>,
    pub total_interest: Decimal,
}

impl DebtSummary {
    pub fn new(debts: &DebtSet, comparison: &StrategyComparison) -> Self {
        Self {
            debt_count: debts.len(),
            total_balance: debts.total_balance(),
            total_minimums: debts.total_minimums(),
            monthly_budget: debts.monthly_budget(),
            highest_rate_percent: debts
                .debts()
                .iter()
                .map(|d| d.annual_interest_rate_percent())
                .max()
                .unwrap_or(Decimal::ZERO),
            recommended: comparison.recommended,
            reasoning: comparison.reasoning.clone(),
            strategies: Strategy::ALL
                .into_iter()
                .map(|strategy| {
                    let result = comparison.result(strategy);
                    StrategySummary {
                        strategy,
                        months: result.total_months(),
                        total_interest: result.total_interest(),
                    }
                })
                .collect(),
        }
    }
}

/// Prompt asking for tips on `summary`, answered as JSON.
pub fn build_prompt(summary: &DebtSummary) -> Result<String, AdvisoryError> {
    let data = serde_json::to_string_pretty(summary)?;
    Ok(format!(
        "You are helping someone repay their debts. Below is a summary of their \
debts and a simulation of three repayment strategies.\n\n{}\n\n\
Give 2 or 3 short, actionable tips. Optionally add one sentence on what to \
prioritise and one warning if something looks risky (for example a budget \
below the minimum payments). Do not repeat the numbers back.\n\
Respond only with JSON of the form \
{{\"tips\": [\"...\"], \"priority\": \"...\" or null, \"warning\": \"...\" or null}}.",
        data
    ))
}

/// Requests advisory text with timeout, a single retry and last-writer-wins.
///
/// Clones share the request counter, so a request issued through any clone
/// supersedes in-flight requests from all of them.
#[derive(Clone)]
pub struct AdvisoryEnricher {
    generator: Arc<dyn TextGenerator>,
    config: AdvisoryConfig,
    latest: Arc<AtomicU64>,
}

impl AdvisoryEnricher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_config(generator, AdvisoryConfig::default())
    }

    pub fn with_config(generator: Arc<dyn TextGenerator>, config: AdvisoryConfig) -> Self {
        Self {
            generator,
            config,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Mark every in-flight request stale without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Ask for tips on `comparison`. Never fails; see [`AdvisoryOutcome`].
    pub async fn enrich(&self, debts: &DebtSet, comparison: &StrategyComparison) -> AdvisoryOutcome {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = match self.request(generation, debts, comparison).await {
            Ok(advisory) => AdvisoryOutcome::Ready(advisory),
            Err(AdvisoryError::Superseded) => AdvisoryOutcome::Stale,
            Err(err) => {
                warn!("advisory unavailable from {}: {}", self.generator.model(), err);
                AdvisoryOutcome::Unavailable(err)
            }
        };

        if !self.is_current(generation) {
            debug!("discarding advisory response #{}: superseded", generation);
            return AdvisoryOutcome::Stale;
        }
        outcome
    }

    fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }

    async fn request(
        &self,
        generation: u64,
        debts: &DebtSet,
        comparison: &StrategyComparison,
    ) -> Result<Advisory, AdvisoryError> {
        let prompt = build_prompt(&DebtSummary::new(debts, comparison))?;
        let mut attempt = 1;
        loop {
            let result = match tokio::time::timeout(self.config.timeout, self.generator.generate(&prompt)).await {
                Ok(Ok(text)) => parsing::parse_advisory(&text),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(AdvisoryError::Timeout(self.config.timeout)),
            };

            match result {
                Ok(advisory) => return Ok(advisory),
                Err(err) if attempt < self.config.max_attempts => {
                    warn!("advisory attempt {} failed: {}; retrying", attempt, err);
                    tokio::time::sleep(self.config.retry_backoff).await;
                    if !self.is_current(generation) {
                        return Err(AdvisoryError::Superseded);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
