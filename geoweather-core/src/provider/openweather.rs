use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{WeatherError, WeatherReport, config::DEFAULT_WEATHER_BASE_URL};

use super::WeatherProvider;

const WEATHER_PATH: &str = "/data/2.5/weather";
const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn/";

/// Client for OpenWeather's current weather endpoint, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

/// Body OpenWeather sends along with a non-2xx status.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_WEATHER_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), WEATHER_PATH),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather_data(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        // Display gives the shortest form: 35.0 goes out as "35".
        let lat = lat.to_string();
        let lon = lon.to_string();
        tracing::debug!(endpoint = %self.endpoint, %lat, %lon, "Requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to send request to OpenWeather: {}", e);
                WeatherError::Network
            })?;

        let status = res.status();

        if !status.is_success() {
            // Any failure to read or parse the error body falls back to the generic message.
            let server_message = res
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<OwErrorBody>(&body).ok())
                .and_then(|body| body.message);

            tracing::warn!(%status, ?server_message, "OpenWeather request failed");
            return Err(WeatherError::api(status.as_u16(), server_message));
        }

        let body = res.text().await.map_err(|e| {
            tracing::warn!("Failed to read OpenWeather response body: {}", e);
            WeatherError::Network
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Failed to parse OpenWeather JSON: {}", e);
            WeatherError::InvalidResponse(e.to_string())
        })
    }
}

/// URL of the 2x icon image for an OpenWeather icon code such as `"04n"`.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_BASE}{icon}@2x.png")
}
