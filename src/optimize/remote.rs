//! HTTP-backed text optimizer
//!
//! Talks to an Ollama-style `POST /api/generate` endpoint. The call is
//! bounded by a request timeout and retried at most once with backoff;
//! every failure mode surfaces as `OptimizationUnavailable`, which the
//! pipeline treats as soft.

use crate::curate::selector::SelectionResult;
use crate::error::{Result, ResumeCuratorError};
use crate::job::JobDescription;
use crate::optimize::{guard, prompts, rewritable_texts, TextOptimizer};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Delay before the single retry.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

pub struct RemoteOptimizer {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    cost_tolerance: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct RewriteReply {
    #[serde(default)]
    rewrites: Vec<RewriteEntry>,
}

#[derive(Deserialize)]
struct RewriteEntry {
    index: usize,
    text: String,
}

impl RemoteOptimizer {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ResumeCuratorError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            cost_tolerance: 0,
        })
    }

    pub fn with_cost_tolerance(mut self, tolerance: u32) -> Self {
        self.cost_tolerance = tolerance;
        self
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let mut last_error = String::new();
        for attempt in 0..2 {
            if attempt > 0 {
                tokio::time::sleep(RETRY_BACKOFF).await;
            }

            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) if response.status().is_success() => {
                    return match response.json::<GenerateResponse>().await {
                        Ok(body) => Ok(body.response),
                        Err(e) => Err(ResumeCuratorError::OptimizationUnavailable(format!(
                            "Malformed response: {}",
                            e
                        ))),
                    };
                }
                Ok(response) => {
                    last_error = format!("HTTP {}", response.status());
                }
                Err(e) => {
                    last_error = format!("Request failed: {}", e);
                }
            }
        }

        Err(ResumeCuratorError::OptimizationUnavailable(last_error))
    }

    fn parse_rewrites(&self, selection: &SelectionResult, reply: &str) -> Result<HashMap<crate::curate::scorer::ItemId, String>> {
        // Models occasionally wrap the JSON in prose or fences; take the
        // outermost object.
        let start = reply.find('{');
        let end = reply.rfind('}');
        let json = match (start, end) {
            (Some(start), Some(end)) if start < end => &reply[start..=end],
            _ => {
                return Err(ResumeCuratorError::OptimizationUnavailable(
                    "Reply contained no JSON object".to_string(),
                ))
            }
        };

        let parsed: RewriteReply = serde_json::from_str(json).map_err(|e| {
            ResumeCuratorError::OptimizationUnavailable(format!("Unparseable reply: {}", e))
        })?;

        let targets = rewritable_texts(selection);
        let mut rewrites = HashMap::new();
        for entry in parsed.rewrites {
            match targets.get(entry.index) {
                Some((id, _)) => {
                    rewrites.insert(*id, entry.text);
                }
                None => debug!("Ignoring rewrite for unknown line {}", entry.index),
            }
        }
        Ok(rewrites)
    }
}

#[async_trait]
impl TextOptimizer for RemoteOptimizer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn optimize(
        &self,
        selection: &SelectionResult,
        job: &JobDescription,
    ) -> Result<SelectionResult> {
        if rewritable_texts(selection).is_empty() {
            return Ok(selection.clone());
        }

        let prompt = prompts::rewrite_prompt(selection, job);
        let reply = self.generate(&prompt).await?;
        let rewrites = self.parse_rewrites(selection, &reply)?;

        let (optimized, rejected) =
            guard::apply_rewrites(selection, &rewrites, self.cost_tolerance);
        for reason in rejected {
            warn!("Discarded rewrite: {}", reason);
        }
        Ok(optimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curate::scorer::{ItemContent, ItemId, ScoredItem};
    use crate::curate::selector::SelectionStatus;

    fn selection() -> SelectionResult {
        SelectionResult {
            items: vec![ScoredItem {
                id: ItemId::ExperienceBullet { entry: 0, bullet: 0 },
                content: ItemContent::Bullet {
                    text: "Operated Kafka clusters".to_string(),
                },
                score: 1.0,
                cost: 1,
            }],
            total_cost: 1,
            total_score: 1.0,
            status: SelectionStatus::Complete,
            budget: 45,
        }
    }

    #[test]
    fn test_parse_rewrites_plain_and_fenced() {
        let optimizer = RemoteOptimizer::new(DEFAULT_ENDPOINT, "test-model").unwrap();
        let selection = selection();

        let plain = r#"{"rewrites": [{"index": 0, "text": "Ran Kafka clusters"}]}"#;
        let parsed = optimizer.parse_rewrites(&selection, plain).unwrap();
        assert_eq!(
            parsed.get(&ItemId::ExperienceBullet { entry: 0, bullet: 0 }),
            Some(&"Ran Kafka clusters".to_string())
        );

        let fenced = "Here you go:\n```json\n{\"rewrites\": [{\"index\": 0, \"text\": \"Ran Kafka clusters\"}]}\n```";
        let parsed = optimizer.parse_rewrites(&selection, fenced).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_rewrites_ignores_unknown_indices() {
        let optimizer = RemoteOptimizer::new(DEFAULT_ENDPOINT, "test-model").unwrap();
        let reply = r#"{"rewrites": [{"index": 7, "text": "nope"}]}"#;
        let parsed = optimizer.parse_rewrites(&selection(), reply).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_parse_rewrites_rejects_non_json() {
        let optimizer = RemoteOptimizer::new(DEFAULT_ENDPOINT, "test-model").unwrap();
        let err = optimizer
            .parse_rewrites(&selection(), "I cannot help with that.")
            .unwrap_err();
        assert!(matches!(err, ResumeCuratorError::OptimizationUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_soft_failure() {
        let optimizer = RemoteOptimizer::with_timeout(
            "http://127.0.0.1:9",
            "test-model",
            Duration::from_millis(200),
        )
        .unwrap();
        let job = JobDescription {
            title: "Dev".to_string(),
            required_skills: vec![],
            preferred_skills: vec![],
            keywords: vec![],
            seniority: None,
        };

        let err = optimizer.optimize(&selection(), &job).await.unwrap_err();
        assert!(matches!(err, ResumeCuratorError::OptimizationUnavailable(_)));
    }
}
