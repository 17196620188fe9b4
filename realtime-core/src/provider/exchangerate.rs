use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{ExchangeRateResult, QueryError};

use super::{DEFAULT_TIMEOUT, RateSource, fetch_json, http_client};

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

const WHAT: &str = "exchange rate";

/// Pair-conversion client for ExchangeRate-API (v6). The key travels in the path.
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ExchangeRateClient {
    pub fn new(api_key: String) -> Result<Self, QueryError> {
        Ok(Self::with_http(api_key, DEFAULT_BASE_URL, http_client(DEFAULT_TIMEOUT)?))
    }

    pub fn with_http(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    /// `{base}/{key}/pair/{from}/{to}`, each segment percent-encoded.
    fn pair_url(&self, from: &str, to: &str) -> Result<Url, QueryError> {
        let invalid = |detail: String| QueryError::InvalidBaseUrl {
            url: self.base_url.clone(),
            detail,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([self.api_key.as_str(), "pair", from, to]);

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ErPairResponse {
    conversion_rate: f64,
    time_last_update_utc: String,
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<ExchangeRateResult, QueryError> {
        debug!(from, to, "requesting exchange rate");

        let url = self.pair_url(from, to)?;
        let parsed: ErPairResponse = fetch_json(self.http.get(url), WHAT).await?;

        Ok(ExchangeRateResult {
            rate: parsed.conversion_rate,
            last_updated: parsed.time_last_update_utc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;
    use std::time::Duration;

    fn client(api_key: &str, base_url: &str) -> ExchangeRateClient {
        let http = http_client(Duration::from_secs(5)).unwrap();
        ExchangeRateClient::with_http(api_key.to_string(), base_url, http)
    }

    #[tokio::test]
    async fn fetch_rate_maps_fields() {
        let mut server = Server::new_async().await;
        let body = json!({
            "result": "success",
            "base_code": "USD",
            "target_code": "EUR",
            "conversion_rate": 0.92,
            "time_last_update_utc": "Mon, 01 Jan 2024 00:00:00 +0000"
        });
        let mock = server
            .mock("GET", "/KEY/pair/USD/EUR")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await;

        let result = client("KEY", &server.url()).fetch_rate("USD", "EUR").await.unwrap();

        assert_eq!(
            result,
            ExchangeRateResult {
                rate: 0.92,
                last_updated: "Mon, 01 Jan 2024 00:00:00 +0000".into(),
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_rate_honours_base_url_with_trailing_slash() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v6/KEY/pair/GBP/JPY")
            .with_status(200)
            .with_body(r#"{"conversion_rate":188.4,"time_last_update_utc":"Tue, 02 Jan 2024 00:00:01 +0000"}"#)
            .create_async()
            .await;

        let base = format!("{}/v6/", server.url());
        let result = client("KEY", &base).fetch_rate("GBP", "JPY").await.unwrap();

        assert_eq!(result.rate, 188.4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_rate_surfaces_message_field() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/KEY/pair/USD/XXX")
            .with_status(404)
            .with_body(r#"{"message":"unsupported code"}"#)
            .create_async()
            .await;

        let err = client("KEY", &server.url()).fetch_rate("USD", "XXX").await.unwrap_err();

        assert_eq!(err.to_string(), "Unable to fetch exchange rate: unsupported code");
    }

    #[tokio::test]
    async fn fetch_rate_surfaces_error_type_field() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/BAD/pair/USD/EUR")
            .with_status(403)
            .with_body(r#"{"result":"error","error-type":"invalid-key"}"#)
            .create_async()
            .await;

        let err = client("BAD", &server.url()).fetch_rate("USD", "EUR").await.unwrap_err();

        match err {
            QueryError::Remote { what, status, message } => {
                assert_eq!(what, "exchange rate");
                assert_eq!(status.as_u16(), 403);
                assert_eq!(message, "invalid-key");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_rate_rejects_missing_rate() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/KEY/pair/USD/EUR")
            .with_status(200)
            .with_body(r#"{"result":"success"}"#)
            .create_async()
            .await;

        let err = client("KEY", &server.url()).fetch_rate("USD", "EUR").await.unwrap_err();

        assert!(matches!(err, QueryError::Decode { what: "exchange rate", .. }));
    }

    #[tokio::test]
    async fn fetch_rate_escapes_path_segments() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/KEY/pair/US%2FD%3Fx=1/EU%23R")
            .with_status(404)
            .with_body(r#"{"result":"error","error-type":"unsupported-code"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client("KEY", &server.url()).fetch_rate("US/D?x=1", "EU#R").await.unwrap_err();

        assert_eq!(err.to_string(), "Unable to fetch exchange rate: unsupported-code");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_rate_rejects_unusable_base_url() {
        let err = client("KEY", "not a url").fetch_rate("USD", "EUR").await.unwrap_err();

        assert!(matches!(err, QueryError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn fetch_rate_normalises_transport_failure() {
        let err = client("SECRETKEY123", "http://127.0.0.1:1")
            .fetch_rate("USD", "EUR")
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("Unable to fetch exchange rate:"));
        assert!(!msg.contains("SECRETKEY123"), "api key leaked: {msg}");
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
        assert!(matches!(err, QueryError::Transport { what: "exchange rate", .. }));
    }
}
