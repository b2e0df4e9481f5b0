//! LLM-generated summaries and recommendations
//!
//! The scoring engine is deterministic; this module adds an optional written
//! interpretation of the metrics. Generators return `Result` and callers turn
//! an error into [`fallback_insights`].

mod gemini;

pub use gemini::GeminiClient;

use crate::seo::Metrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summary recorded when insights were requested but no API key is configured
pub const MISSING_API_KEY_SUMMARY: &str = "AI Configuration missing (API Key).";

/// Summary used when the generator failed
pub const FALLBACK_SUMMARY: &str = "AI analysis is currently unavailable due to a technical issue.";

/// Number of characters of the error message kept in the fallback
const FALLBACK_ERROR_CHARS: usize = 100;

/// Written interpretation of a metrics object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// Errors raised while generating insights
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response contained no text")]
    EmptyResponse,

    #[error("LLM response is not valid insight JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Produces insights for a metrics object
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, metrics: &Metrics) -> Result<Insights, InsightError>;
}

/// The fixed result substituted for a failed generation
pub fn fallback_insights(error_message: &str) -> Insights {
    let truncated: String = error_message.chars().take(FALLBACK_ERROR_CHARS).collect();
    Insights {
        summary: FALLBACK_SUMMARY.to_string(),
        recommendations: vec![
            "Please try again later.".to_string(),
            "Verify API key configuration.".to_string(),
            format!("Error: {}...", truncated),
        ],
    }
}

/// Runs a generator and collapses any error into the fallback
pub async fn generate_or_fallback(generator: &dyn InsightGenerator, metrics: &Metrics) -> Insights {
    match generator.generate(metrics).await {
        Ok(insights) => insights,
        Err(e) => {
            tracing::warn!("Insight generation failed, using fallback: {}", e);
            fallback_insights(&e.to_string())
        }
    }
}
