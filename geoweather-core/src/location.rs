//! Turning the platform's callback-style position request into a single future.

use crate::{Coordinate, WeatherError, error::LocationErrorKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::sync::oneshot;

pub mod fixed;
pub mod ipapi;

pub use fixed::FixedSource;
pub use ipapi::IpApiSource;

/// How long the platform may take before reporting a timeout.
pub const LOCATION_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Options passed to a single platform position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub enable_high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self { timeout: LOCATION_TIMEOUT, enable_high_accuracy: true }
    }
}

/// A position fix as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A platform failure; `code` uses the constants in [`crate::error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

pub type SuccessCallback = Box<dyn FnOnce(Position) + Send + 'static>;
pub type ErrorCallback = Box<dyn FnOnce(PositionError) + Send + 'static>;

/// The host platform's geolocation capability.
///
/// Implementations call exactly one of the callbacks, at most once.
pub trait PositionSource: Send + Sync + Debug {
    fn get_current_position(
        &self,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
        options: PositionOptions,
    );
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn get_current_location(&self) -> Result<Coordinate, WeatherError>;
}

/// [`LocationProvider`] backed by an optional platform [`PositionSource`].
#[derive(Debug, Clone)]
pub struct GeolocationProvider {
    platform: Option<Arc<dyn PositionSource>>,
    options: PositionOptions,
}

impl GeolocationProvider {
    pub fn new(platform: Arc<dyn PositionSource>) -> Self {
        Self { platform: Some(platform), options: PositionOptions::default() }
    }

    /// A provider on a platform with no geolocation capability.
    pub fn unsupported() -> Self {
        Self { platform: None, options: PositionOptions::default() }
    }
}

#[async_trait]
impl LocationProvider for GeolocationProvider {
    async fn get_current_location(&self) -> Result<Coordinate, WeatherError> {
        let Some(platform) = &self.platform else {
            return Err(WeatherError::Unsupported);
        };

        let (tx, rx) = oneshot::channel::<Result<Position, PositionError>>();
        // Shared by both callbacks; whichever runs first takes the sender.
        let slot = Arc::new(Mutex::new(Some(tx)));
        let error_slot = Arc::clone(&slot);

        platform.get_current_position(
            Box::new(move |position| {
                if let Some(tx) = slot.lock().take() {
                    let _ = tx.send(Ok(position));
                }
            }),
            Box::new(move |error| {
                if let Some(tx) = error_slot.lock().take() {
                    let _ = tx.send(Err(error));
                }
            }),
            self.options,
        );

        match rx.await {
            Ok(Ok(position)) => {
                tracing::debug!(
                    lat = position.latitude,
                    lon = position.longitude,
                    "Obtained current position"
                );
                Ok(Coordinate::new(position.latitude, position.longitude))
            }
            Ok(Err(error)) => {
                tracing::warn!(code = error.code, platform_message = %error.message, "Position request failed");
                Err(LocationErrorKind::from_code(error.code).into())
            }
            Err(_) => {
                tracing::warn!("Position source dropped both callbacks");
                Err(LocationErrorKind::Unknown.into())
            }
        }
    }
}
