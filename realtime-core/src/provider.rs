use crate::{ExchangeRateResult, QueryError, WeatherResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use std::{convert::TryFrom, fmt::Debug, time::Duration};
use tracing::{debug, warn};

pub mod exchangerate;
pub mod openweather;

pub use exchangerate::ExchangeRateClient;
pub use openweather::OpenWeatherClient;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    ExchangeRate,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::ExchangeRate => "exchangerate",
        }
    }

    /// Human-facing name of the service behind the id.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OpenWeatherMap",
            ProviderId::ExchangeRate => "ExchangeRate-API",
        }
    }

    /// Environment variable that overrides the configured API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::ExchangeRate => "EXCHANGERATE_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::ExchangeRate]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "exchangerate" => Ok(ProviderId::ExchangeRate),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, exchangerate."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, QueryError>;
}

#[async_trait]
pub trait RateSource: Send + Sync + Debug {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<ExchangeRateResult, QueryError>;
}

/// Build the HTTP client shared by both providers.
pub fn http_client(timeout: Duration) -> Result<Client, QueryError> {
    Client::builder().timeout(timeout).build().map_err(QueryError::HttpClient)
}

/// Error body shape used by both providers. ExchangeRate-API reports
/// `error-type` where OpenWeather reports `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

fn remote_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error_type))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Send one request and decode a successful JSON body into `T`.
///
/// `what` names the data being fetched and prefixes every error message.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &'static str,
) -> Result<T, QueryError> {
    let res = request.send().await.map_err(|e| transport(what, e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| transport(what, e))?;

    if !status.is_success() {
        warn!(%status, body = %truncate_body(&body), "{what} request failed");
        return Err(QueryError::Remote { what, status, message: remote_message(&body) });
    }

    debug!(%status, bytes = body.len(), "{what} response received");

    serde_json::from_str(&body).map_err(|e| QueryError::Decode { what, detail: e.to_string() })
}

/// Strips the request URL, which carries the API key.
fn transport(what: &'static str, source: reqwest::Error) -> QueryError {
    QueryError::Transport { what, source: source.without_url() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
