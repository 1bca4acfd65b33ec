//! Ollama text generation backend.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AdvisoryError, TextGenerator};

const DEFAULT_MODEL: &str = "llama3.2";

/// HTTP client for Ollama's `/api/generate` endpoint.
///
/// Requests JSON-formatted, non-streaming completions. Timeouts are left
/// to the caller ([`AdvisoryEnricher`](super::AdvisoryEnricher) applies its own).
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Build from `OLLAMA_HOST` (required) and `OLLAMA_MODEL` (default `llama3.2`).
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(&host, &model))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: OllamaResponse = response.json().await?;
        debug!("Ollama advisory response: {}", body.response);
        Ok(body.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
