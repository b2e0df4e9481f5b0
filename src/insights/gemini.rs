//! Gemini `generateContent` client

use crate::config::InsightsConfig;
use crate::insights::{InsightError, InsightGenerator, Insights};
use crate::seo::Metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are an expert Technical SEO Auditor. Your task is to analyze a \
set of SEO metrics and provide a critical but helpful summary and a list of actionable \
recommendations. Focus on the issues that caused penalties in the SEO score. Respond with a \
single JSON object with two keys: \"summary\" (a 2-3 paragraph executive summary of the SEO \
analysis) and \"recommendations\" (a list of 3 to 5 actionable recommendations to improve the \
SEO score).";

/// Client for the Gemini REST API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model_name: String,
    api_key: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Builds a client from the insights configuration
    ///
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &InsightsConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            api_key: api_key.to_string(),
            temperature: config.temperature,
        }))
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model_name
        )
    }

    fn request_body(&self, metrics: &Metrics) -> Result<serde_json::Value, InsightError> {
        let metrics_json = serde_json::to_string_pretty(metrics)?;
        Ok(json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_PROMPT }]
            },
            "contents": [{
                "role": "user",
                "parts": [{
                    "text": format!(
                        "Please analyze the following SEO metrics and generate your insights: \n\n```json\n{}\n```",
                        metrics_json
                    )
                }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json"
            }
        }))
    }
}

/// Extracts the insight object from the model's text output
///
/// Models sometimes wrap JSON in a fenced code block even when asked not to.
fn parse_insights(text: &str) -> Result<Insights, InsightError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    Ok(serde_json::from_str(unfenced.trim())?)
}

#[async_trait]
impl InsightGenerator for GeminiClient {
    async fn generate(&self, metrics: &Metrics) -> Result<Insights, InsightError> {
        let body = self.request_body(metrics)?;

        tracing::debug!("Requesting insights from model {}", self.model_name);

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or(InsightError::EmptyResponse)?;

        parse_insights(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> InsightsConfig {
        InsightsConfig {
            api_key: key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_client_without_key() {
        assert!(GeminiClient::from_config(&config_with_key(None))
            .unwrap()
            .is_none());
        assert!(GeminiClient::from_config(&config_with_key(Some("   ")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_request_url() {
        let mut config = config_with_key(Some("k"));
        config.endpoint = "http://localhost:1234/v1beta/".to_string();
        config.model_name = "gemini-test".to_string();

        let client = GeminiClient::from_config(&config).unwrap().unwrap();
        assert_eq!(
            client.request_url(),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_embeds_metrics() {
        let client = GeminiClient::from_config(&config_with_key(Some("k")))
            .unwrap()
            .unwrap();
        let body = client.request_body(&Metrics::worst_case()).unwrap();

        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"load_time_status\": \"fail\""));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_parse_plain_json() {
        let insights =
            parse_insights(r#"{"summary": "Good", "recommendations": ["Add alt text"]}"#).unwrap();
        assert_eq!(insights.summary, "Good");
        assert_eq!(insights.recommendations, vec!["Add alt text"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"summary\": \"Fine\", \"recommendations\": []}\n```";
        let insights = parse_insights(text).unwrap();
        assert_eq!(insights.summary, "Fine");
        assert!(insights.recommendations.is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_insights("Here are my thoughts"),
            Err(InsightError::InvalidJson(_))
        ));
    }
}
