use crate::{Config, FetchError, LocationQuery, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for a resolved location.
    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherReading, FetchError>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not an error here: the request is still sent and the
/// provider answers with an authentication failure.
pub fn provider_from_config(config: &Config) -> OpenWeatherProvider {
    let api_key = config.api_key().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!(
            "No OpenWeather API key configured; requests will be rejected. \
             Hint: run `weatherview configure` or set OPENWEATHER_API_KEY."
        );
    }

    OpenWeatherProvider::with_base_url(api_key.to_owned(), &config.base_url)
}
