//! Extraction of advisory JSON from free-form model output.
//!
//! Models often wrap the requested JSON in prose or code fences, so the
//! parser looks for the outermost `{ ... }` span.

use super::{Advisory, AdvisoryError};
use chrono::Utc;
use serde::Deserialize;

/// Most tips kept from a single response.
pub const MAX_TIPS: usize = 3;

#[derive(Debug, Deserialize)]
struct RawAdvisory {
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    warning: Option<String>,
}

/// Parse an [`Advisory`] from a model response.
pub fn parse_advisory(response: &str) -> Result<Advisory, AdvisoryError> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(AdvisoryError::Malformed(format!(
                "no JSON found | Raw: {}",
                truncate(response)
            )))
        }
    };

    let raw: RawAdvisory = serde_json::from_str(json_str).map_err(|e| {
        AdvisoryError::Malformed(format!("{} | Raw: {}", e, truncate(json_str)))
    })?;

    let tips: Vec<String> = raw
        .tips
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_TIPS)
        .collect();
    if tips.is_empty() {
        return Err(AdvisoryError::Malformed("response contained no tips".into()));
    }

    Ok(Advisory {
        tips,
        priority: non_empty(raw.priority),
        warning: non_empty(raw.warning),
        generated_at: Utc::now(),
    })
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn truncate(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}
