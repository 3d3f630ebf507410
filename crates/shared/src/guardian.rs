use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{error, info};

use crate::briefing::NewsSource;
use crate::error::FetchError;
use crate::models::Article;

pub const GUARDIAN_API_URL: &str = "https://content.guardianapis.com";

#[derive(Debug, Deserialize)]
struct GuardianEnvelope {
    response: GuardianResponse,
}

#[derive(Debug, Deserialize)]
struct GuardianResponse {
    #[serde(default)]
    results: Vec<GuardianResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianResult {
    web_title: String,
    web_url: String,
    #[serde(default)]
    fields: Option<GuardianFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFields {
    #[serde(default)]
    body_text: String,
}

impl From<GuardianResult> for Article {
    fn from(result: GuardianResult) -> Self {
        Article {
            title: result.web_title,
            url: result.web_url,
            body_text: result.fields.map(|f| f.body_text).unwrap_or_default(),
        }
    }
}

/// Client for The Guardian Open Platform content search
pub struct GuardianClient {
    client: Client,
    api_key: String,
    section: String,
    base_url: String,
}

impl GuardianClient {
    pub fn new(api_key: String, section: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            section,
            base_url: GUARDIAN_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Single search request for the latest articles in the configured section.
    pub async fn try_fetch(&self, max_articles: usize) -> Result<Vec<Article>, FetchError> {
        if max_articles == 0 {
            return Ok(Vec::new());
        }

        let page_size = max_articles.to_string();
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url.trim_end_matches('/')),
            [
                ("section", self.section.as_str()),
                ("page-size", page_size.as_str()),
                ("show-fields", "bodyText"),
                ("api-key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        // The api key travels in the query string, so strip urls from errors
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        let envelope: GuardianEnvelope = serde_json::from_str(&body)?;

        Ok(envelope
            .response
            .results
            .into_iter()
            .take(max_articles)
            .map(Article::from)
            .collect())
    }
}

#[async_trait::async_trait]
impl NewsSource for GuardianClient {
    async fn fetch(&self, max_articles: usize) -> Vec<Article> {
        info!(section = %self.section, "Fetching latest news from The Guardian...");
        match self.try_fetch(max_articles).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched articles");
                articles
            }
            Err(e) => {
                error!(error = %e, "Error fetching from The Guardian API");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TWO_RESULTS: &str = r#"{
        "response": {
            "status": "ok",
            "results": [
                {
                    "id": "world/1",
                    "webTitle": "Summit ends without deal",
                    "webUrl": "https://www.theguardian.com/world/1",
                    "fields": { "bodyText": "Leaders left the summit on Friday." }
                },
                {
                    "id": "world/2",
                    "webTitle": "Floods in the north",
                    "webUrl": "https://www.theguardian.com/world/2",
                    "fields": { "bodyText": "Rivers burst their banks overnight." }
                }
            ]
        }
    }"#;

    fn client(server: &mockito::ServerGuard) -> GuardianClient {
        GuardianClient::new("test-key".to_string(), "world".to_string())
            .unwrap()
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_fetch_maps_results_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("section".into(), "world".into()),
                Matcher::UrlEncoded("page-size".into(), "5".into()),
                Matcher::UrlEncoded("show-fields".into(), "bodyText".into()),
                Matcher::UrlEncoded("api-key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_RESULTS)
            .create_async()
            .await;

        let articles = client(&server).fetch(5).await;

        assert_eq!(
            articles,
            vec![
                Article::new(
                    "Summit ends without deal",
                    "https://www.theguardian.com/world/1",
                    "Leaders left the summit on Friday."
                ),
                Article::new(
                    "Floods in the north",
                    "https://www.theguardian.com/world/2",
                    "Rivers burst their banks overnight."
                ),
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_server_error_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .expect(2)
            .create_async()
            .await;

        let client = client(&server);
        let err = client.try_fetch(5).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == 500));

        assert!(client.fetch(5).await.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": "#)
            .create_async()
            .await;

        let client = client(&server);
        assert!(matches!(
            client.try_fetch(5).await,
            Err(FetchError::Parse(_))
        ));
        assert!(client.fetch(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_body_text_becomes_empty_string() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"response": {"results": [
                    {"webTitle": "Live blog", "webUrl": "https://example.com/live"}
                ]}}"#,
            )
            .create_async()
            .await;

        let articles = client(&server).fetch(5).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Live blog");
        assert!(articles[0].body_text.is_empty());
    }

    #[tokio::test]
    async fn test_results_capped_at_requested_count() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("page-size".into(), "1".into()))
            .with_status(200)
            .with_body(TWO_RESULTS)
            .create_async()
            .await;

        let articles = client(&server).fetch(1).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Summit ends without deal");
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        let client = GuardianClient::new("test-key".to_string(), "world".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let err = client.try_fetch(5).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
