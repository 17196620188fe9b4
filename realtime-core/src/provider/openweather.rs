use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{QueryError, WeatherResult};

use super::{DEFAULT_TIMEOUT, WeatherSource, fetch_json, http_client};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const WHAT: &str = "weather data";

/// Current-weather client for OpenWeatherMap.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, QueryError> {
        Ok(Self::with_http(api_key, DEFAULT_BASE_URL, http_client(DEFAULT_TIMEOUT)?))
    }

    /// Use a caller-supplied HTTP client and base URL (proxies, test servers).
    pub fn with_http(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, QueryError> {
        debug!(city, "requesting current weather");

        let request = self.http.get(format!("{}/weather", self.base_url)).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);

        let parsed: OwCurrentResponse = fetch_json(request, WHAT).await?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| QueryError::Decode {
                what: WHAT,
                detail: "response contained no weather conditions".to_string(),
            })?;

        Ok(WeatherResult {
            temperature: parsed.main.temp,
            description,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
        })
    }
}
