use crate::{Config, WeatherError, WeatherReport, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather_data(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is passed through as an empty credential; the service
/// answers with its own error in that case.
pub fn provider_from_config(config: &Config) -> OpenWeatherProvider {
    if config.api_key.is_none() {
        tracing::debug!("No OpenWeather API key configured; requests will be rejected upstream");
    }

    OpenWeatherProvider::with_base_url(config.api_key_or_empty(), &config.weather_base_url)
}
