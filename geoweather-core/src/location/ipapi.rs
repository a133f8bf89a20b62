use super::{ErrorCallback, Position, PositionError, PositionOptions, PositionSource, SuccessCallback};
use crate::error::{POSITION_UNAVAILABLE, TIMEOUT};
use reqwest::Client;
use serde::Deserialize;
use tokio::runtime::Handle;

const FIELDS: &str = "status,message,lat,lon";
const USER_AGENT: &str = concat!("geoweather/", env!("CARGO_PKG_VERSION"));

/// IP-based geolocation through ip-api.com.
///
/// Accuracy is city-level at best; `enable_high_accuracy` is accepted but has
/// no effect on the lookup.
#[derive(Debug, Clone)]
pub struct IpApiSource {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiSource {
    pub fn new(url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build geolocation client, using defaults: {}", e);
                Client::new()
            });

        Self { url: url.into(), http }
    }

    async fn lookup(&self, options: PositionOptions) -> Result<Position, PositionError> {
        if options.enable_high_accuracy {
            tracing::debug!("High accuracy requested; IP lookup resolves to city level");
        }

        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", FIELDS)])
            .timeout(options.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(PositionError::new(
                POSITION_UNAVAILABLE,
                format!("Geolocation service returned status {status}"),
            ));
        }

        let body: IpApiResponse = res.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                PositionError::new(POSITION_UNAVAILABLE, format!("Malformed geolocation response: {e}"))
            }
        })?;

        if body.status != "success" {
            return Err(PositionError::new(
                POSITION_UNAVAILABLE,
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Position { latitude, longitude }),
            _ => Err(PositionError::new(
                POSITION_UNAVAILABLE,
                "Geolocation response is missing coordinates",
            )),
        }
    }
}

fn transport_error(e: reqwest::Error) -> PositionError {
    let code = if e.is_timeout() { TIMEOUT } else { POSITION_UNAVAILABLE };
    PositionError::new(code, e.to_string())
}

impl PositionSource for IpApiSource {
    /// The lookup runs on the current Tokio runtime; without one the request
    /// fails with `POSITION_UNAVAILABLE`.
    fn get_current_position(
        &self,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
        options: PositionOptions,
    ) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("No Tokio runtime available for IP geolocation");
            on_error(PositionError::new(POSITION_UNAVAILABLE, "No async runtime available"));
            return;
        };

        let source = self.clone();
        handle.spawn(async move {
            match source.lookup(options).await {
                Ok(position) => on_success(position),
                Err(error) => on_error(error),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn without_runtime_reports_unavailable() {
        let source = IpApiSource::new("http://127.0.0.1:9/json/");
        let outcome: Arc<Mutex<Option<Result<Position, PositionError>>>> = Arc::default();
        let ok_slot = Arc::clone(&outcome);
        let err_slot = Arc::clone(&outcome);

        source.get_current_position(
            Box::new(move |pos| *ok_slot.lock() = Some(Ok(pos))),
            Box::new(move |err| *err_slot.lock() = Some(Err(err))),
            PositionOptions::default(),
        );

        let err = outcome.lock().take().expect("callback ran synchronously").unwrap_err();
        assert_eq!(err.code, POSITION_UNAVAILABLE);
    }
}
