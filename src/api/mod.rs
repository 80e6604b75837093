use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::ServerConfig;

/// Body of `GET /fetch_markdown`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct MarkdownResponse {
    #[serde(default)]
    pub content: Value,
}

impl MarkdownResponse {
    /// The markdown text, or `None` when `content` is absent or falsy (`null`, `false`,
    /// `0`, `""`). A truthy non-string value is malformed.
    pub fn into_markdown(self) -> Result<Option<String>> {
        match self.content {
            Value::Null | Value::Bool(false) => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
            other => bail!("unexpected content value: {}", other),
        }
    }
}

/// HTTP client for the digest server.
///
/// Uses the async `reqwest::Client` and returns `anyhow::Result` with contextualized
/// errors so the caller can log the full chain.
#[derive(Clone)]
pub struct ContentService {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ContentService {
    pub fn new(server: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: server.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(server.timeout_secs),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(&ServerConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the server-rendered page for `date`.
    pub fn page_url(&self, date: &str) -> String {
        format!("{}/?date={}", self.base_url, date)
    }

    /// Fetch the markdown digest of `app_name` for `date`. `Ok(None)` means the server
    /// has no data for that date.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_markdown(&self, app_name: &str, date: &str) -> Result<Option<String>> {
        let url = format!("{}/fetch_markdown", self.base_url);
        let start = std::time::Instant::now();

        let resp = self
            .client
            .get(&url)
            .query(&[("app_name", app_name), ("date", date)])
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?
            .error_for_status()
            .with_context(|| format!("fetch_markdown failed for {} on {}", app_name, date))?;

        let body: MarkdownResponse = resp
            .json()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))?;

        tracing::debug!(elapsed = ?start.elapsed(), "fetch_markdown");
        body.into_markdown()
            .with_context(|| format!("fetch_markdown returned bad content for {}", app_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn query(app_name: &str, date: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("app_name".into(), app_name.into()),
            Matcher::UrlEncoded("date".into(), date.into()),
        ])
    }

    #[test]
    fn test_falsy_content_values() {
        for body in [
            r#"{"content": null}"#,
            r#"{"content": ""}"#,
            r#"{"content": false}"#,
            r#"{"content": 0}"#,
            r#"{}"#,
        ] {
            let resp: MarkdownResponse = serde_json::from_str(body).unwrap();
            assert_eq!(resp.into_markdown().unwrap(), None, "body: {}", body);
        }
    }

    #[test]
    fn test_truthy_non_string_content_is_malformed() {
        let resp: MarkdownResponse = serde_json::from_str(r#"{"content": {"a": 1}}"#).unwrap();
        assert!(resp.into_markdown().is_err());
    }

    #[test]
    fn test_configured_base_url_is_trimmed() {
        let service = ContentService::new(&ServerConfig {
            base_url: "http://digest.local:9000/".to_string(),
            timeout_secs: 5,
        });
        assert_eq!(service.base_url(), "http://digest.local:9000");
    }

    #[test]
    fn test_page_url() {
        let service = ContentService::with_base_url("http://localhost:8080/");
        assert_eq!(
            service.page_url("2025-01-02"),
            "http://localhost:8080/?date=2025-01-02"
        );
    }

    #[tokio::test]
    async fn test_fetch_markdown_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/fetch_markdown")
            .match_query(query("hacker_news", "2025-01-02"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r##"{"content": "# Hacker News\n\n## Story"}"##)
            .create_async()
            .await;

        let service = ContentService::with_base_url(server.url());
        let result = service.fetch_markdown("hacker_news", "2025-01-02").await;

        mock.assert_async().await;
        assert_eq!(
            result.unwrap(),
            Some("# Hacker News\n\n## Story".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_markdown_no_data() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fetch_markdown")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content": null}"#)
            .create_async()
            .await;

        let service = ContentService::with_base_url(server.url());
        let result = service.fetch_markdown("tech_feed", "2025-01-02").await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_markdown_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fetch_markdown")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let service = ContentService::with_base_url(server.url());
        let err = service
            .fetch_markdown("tech_feed", "2025-01-02")
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse JSON"));
    }

    #[tokio::test]
    async fn test_fetch_markdown_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fetch_markdown")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let service = ContentService::with_base_url(server.url());
        let result = service.fetch_markdown("tech_feed", "2025-01-02").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_markdown_network_error() {
        let service = ContentService::with_base_url("http://localhost:1");
        let err = service
            .fetch_markdown("tech_feed", "2025-01-02")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to send GET request"));
    }
}
