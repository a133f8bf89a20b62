//! The location-then-weather sequence and the single view state it drives.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::watch;

use crate::{LocationProvider, WeatherProvider, WeatherReport, display};

pub const TITLE: &str = "Weather App";
pub const LOADING_TEXT: &str = "Loading weather data...";
pub const TRY_AGAIN: &str = "Try Again";
pub const REFRESH: &str = "Refresh";

/// What the user is currently looking at. Exactly one is active.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error(String),
    Loaded(WeatherReport),
}

impl ViewState {
    /// Label of the control that starts a new attempt, if one is offered.
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            ViewState::Loading => None,
            ViewState::Error(_) => Some(TRY_AGAIN),
            ViewState::Loaded(_) => Some(REFRESH),
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f)?;

        match self {
            ViewState::Loading => writeln!(f, "{LOADING_TEXT}")?,
            ViewState::Error(message) => writeln!(f, "{message}")?,
            ViewState::Loaded(report) => {
                if let Some(view) = display::render(Some(report)) {
                    write!(f, "{view}")?;
                }
            }
        }

        if let Some(action) = self.action_label() {
            writeln!(f)?;
            writeln!(f, "[{action}]")?;
        }
        Ok(())
    }
}

/// Runs attempts and publishes every state transition.
///
/// Each attempt gets a sequence number; an attempt that finishes after a newer
/// one has started is dropped instead of overwriting the newer state.
#[derive(Debug)]
pub struct WeatherApp {
    location: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherProvider>,
    state: watch::Sender<ViewState>,
    latest_attempt: AtomicU64,
}

impl WeatherApp {
    pub fn new(location: Arc<dyn LocationProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self { location, weather, state, latest_attempt: AtomicU64::new(0) }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Watch state transitions, including the Loading that starts each attempt.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Initial load; identical to [`WeatherApp::retry`].
    pub async fn load(&self) -> ViewState {
        self.run_attempt().await
    }

    /// User-triggered retry/refresh from any state.
    pub async fn retry(&self) -> ViewState {
        self.run_attempt().await
    }

    async fn run_attempt(&self) -> ViewState {
        let attempt = self.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ViewState::Loading);
        tracing::info!(attempt, "Loading weather data");

        let next = match self.fetch().await {
            Ok(report) => {
                tracing::info!(attempt, location = %report.name, "Weather loaded");
                ViewState::Loaded(report)
            }
            Err(message) => {
                tracing::info!(attempt, %message, "Attempt failed");
                ViewState::Error(message)
            }
        };

        let applied = self.state.send_if_modified(|current| {
            if self.latest_attempt.load(Ordering::SeqCst) != attempt {
                return false;
            }
            *current = next;
            true
        });

        if !applied {
            tracing::warn!(attempt, "Discarding result of superseded attempt");
        }

        self.state()
    }

    /// Location first; the weather call only happens if it succeeds.
    async fn fetch(&self) -> Result<WeatherReport, String> {
        let coord = self.location.get_current_location().await.map_err(|e| e.to_string())?;

        self.weather
            .fetch_weather_data(coord.lat, coord.lon)
            .await
            .map_err(|e| e.to_string())
    }
}
