use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::briefing::Summarize;
use crate::error::SummarizeError;

pub const COHERE_API_URL: &str = "https://api.cohere.ai";
const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Bullets(String),
    Failed(String),
}

impl Summary {
    pub fn is_failed(&self) -> bool {
        matches!(self, Summary::Failed(_))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Bullets(text) => f.write_str(text),
            Summary::Failed(reason) => {
                write!(f, "Could not summarize. Cohere API Error: {}", reason)
            }
        }
    }
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    model: &'a str,
    length: &'static str,
    format: &'static str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

pub struct CohereSummarizer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CohereSummarizer {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: COHERE_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn try_summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let request = SummarizeRequest {
            text,
            model: &self.model,
            length: "short",
            format: "bullets",
        };

        let response = self
            .client
            .post(format!("{}/v1/summarize", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(SummarizeError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(SummarizeError::Http)?;

        if !status.is_success() {
            return Err(SummarizeError::Status {
                status,
                body: truncate_detail(&body),
            });
        }

        let parsed: SummarizeResponse = serde_json::from_str(&body)?;
        Ok(parsed.summary)
    }
}

/// Error bodies can be whole HTML pages; keep only the start
fn truncate_detail(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_DETAIL_CHARS {
        return body.to_string();
    }
    let mut detail: String = body.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    detail.push('…');
    detail
}

#[async_trait::async_trait]
impl Summarize for CohereSummarizer {
    async fn summarize(&self, text: &str) -> Summary {
        debug!(chars = text.len(), "Summarizing with Cohere AI...");
        match self.try_summarize(text).await {
            Ok(bullets) => Summary::Bullets(bullets),
            Err(e) => {
                warn!(error = %e, "Failed to summarize article");
                Summary::Failed(e.to_string())
            }
        }
    }
}
