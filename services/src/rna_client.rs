use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use util::config;

use crate::error::MetricsError;

/// HTTP client for the RNA performance metrics endpoint.
///
/// One GET per [`RnaClient::fetch`], no retries. Only `200 OK` with a JSON
/// body counts as success.
#[derive(Clone, Debug)]
pub struct RnaClient {
    http: reqwest::Client,
    url: String,
}

impl RnaClient {
    /// Builds a client for `url`.
    ///
    /// `accept_invalid_certs` turns TLS certificate verification off. It exists
    /// for upstreams with self-signed certificates and is logged when used.
    pub fn new(
        url: impl Into<String>,
        accept_invalid_certs: bool,
        timeout: Duration,
    ) -> Result<Self, MetricsError> {
        let url = url.into();
        if accept_invalid_certs {
            tracing::warn!(%url, "TLS certificate verification is disabled for the RNA client");
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .timeout(timeout)
            .build()
            .map_err(|e| MetricsError::FetchFailure(format!("could not build HTTP client: {e}")))?;

        Ok(Self { http, url })
    }

    /// Client configured from `RNA_DATA_URL`, `RNA_ACCEPT_INVALID_CERTS` and
    /// `RNA_TIMEOUT_SECONDS`.
    pub fn from_config() -> Result<Self, MetricsError> {
        Self::new(
            config::rna_data_url(),
            config::rna_accept_invalid_certs(),
            Duration::from_secs(config::rna_timeout_seconds()),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Value, MetricsError> {
        if self.url.trim().is_empty() {
            return Err(MetricsError::FetchFailure("RNA_DATA_URL is not configured".into()));
        }

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MetricsError::FetchFailure(format!("request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(MetricsError::FetchFailure(format!("upstream returned {status}")));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| MetricsError::FetchFailure(format!("response is not JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubResponse, spawn_upstream};
    use serde_json::json;

    fn client(url: String) -> RnaClient {
        RnaClient::new(url, false, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn ok_response_is_parsed() {
        let url = spawn_upstream(StubResponse::json(json!({ "result": { "devices": [] } }))).await;

        let body = client(url).fetch().await.unwrap();
        assert_eq!(body, json!({ "result": { "devices": [] } }));
    }

    #[tokio::test]
    async fn non_ok_status_is_a_fetch_failure() {
        let url = spawn_upstream(StubResponse::status(503)).await;

        let err = client(url).fetch().await.unwrap_err();
        assert!(matches!(err, MetricsError::FetchFailure(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn other_success_codes_are_rejected() {
        let url = spawn_upstream(StubResponse::status(204)).await;

        assert!(matches!(
            client(url).fetch().await,
            Err(MetricsError::FetchFailure(_))
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_a_fetch_failure() {
        let url = spawn_upstream(StubResponse::text("<html>maintenance</html>")).await;

        assert!(matches!(
            client(url).fetch().await,
            Err(MetricsError::FetchFailure(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_failure() {
        // Port 9 (discard) is closed on test hosts.
        let err = client("http://127.0.0.1:9/metrics".into()).fetch().await.unwrap_err();
        assert!(matches!(err, MetricsError::FetchFailure(_)));
    }

    #[tokio::test]
    async fn slow_upstream_hits_timeout() {
        let url = spawn_upstream(StubResponse::delayed(Duration::from_secs(2))).await;
        let client = RnaClient::new(url, false, Duration::from_millis(200)).unwrap();

        assert!(matches!(
            client.fetch().await,
            Err(MetricsError::FetchFailure(_))
        ));
    }

    #[tokio::test]
    async fn empty_url_fails_without_request() {
        let err = client(String::new()).fetch().await.unwrap_err();
        assert!(matches!(err, MetricsError::FetchFailure(msg) if msg.contains("RNA_DATA_URL")));
    }
}
