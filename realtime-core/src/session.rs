//! Query flow shared by every front end: credential gate, input checks,
//! one provider call per query.

use tracing::info;

use crate::{
    Config, MissingInput, QueryError, RateReport, WeatherReport,
    provider::{
        ExchangeRateClient, OpenWeatherClient, ProviderId, RateSource, WeatherSource, exchangerate,
        http_client, openweather,
    },
};

#[derive(Debug)]
pub struct Dashboard {
    weather: Box<dyn WeatherSource>,
    rates: Box<dyn RateSource>,
}

impl Dashboard {
    pub fn new(weather: Box<dyn WeatherSource>, rates: Box<dyn RateSource>) -> Self {
        Self { weather, rates }
    }

    /// Build both provider clients from config.
    ///
    /// Fails with [`MissingInput::ApiKeys`] unless both keys are present, so
    /// neither query is reachable with a partial configuration.
    pub fn from_config(config: &Config) -> Result<Self, QueryError> {
        let (Some(weather_key), Some(rate_key)) = (
            config.provider_api_key(ProviderId::OpenWeather),
            config.provider_api_key(ProviderId::ExchangeRate),
        ) else {
            return Err(MissingInput::ApiKeys.into());
        };

        let http = http_client(config.timeout())?;

        let weather = OpenWeatherClient::with_http(
            weather_key.to_owned(),
            config
                .provider_base_url(ProviderId::OpenWeather)
                .unwrap_or(openweather::DEFAULT_BASE_URL),
            http.clone(),
        );
        let rates = ExchangeRateClient::with_http(
            rate_key.to_owned(),
            config
                .provider_base_url(ProviderId::ExchangeRate)
                .unwrap_or(exchangerate::DEFAULT_BASE_URL),
            http,
        );

        Ok(Self::new(Box::new(weather), Box::new(rates)))
    }

    pub async fn weather(&self, city: &str) -> Result<WeatherReport, QueryError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(MissingInput::City.into());
        }

        info!(city, "weather query");
        let result = self.weather.fetch_weather(city).await?;

        Ok(WeatherReport { city: city.to_string(), result })
    }

    /// Currency codes are upper-cased before the provider sees them.
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<RateReport, QueryError> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(MissingInput::Currencies.into());
        }

        let (from, to) = (from.to_uppercase(), to.to_uppercase());

        info!(%from, %to, "exchange rate query");
        let result = self.rates.fetch_rate(&from, &to).await?;

        Ok(RateReport { from, to, result })
    }
}
