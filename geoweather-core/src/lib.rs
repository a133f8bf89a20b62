//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - Location lookup over a callback-style platform capability
//! - The OpenWeather current-weather client
//! - The view state machine that sequences the two
//! - Formatting of a weather report for display
//! - Configuration & credentials handling
//!
//! It is used by `geoweather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;

pub use app::{ViewState, WeatherApp};
pub use config::Config;
pub use display::{WeatherView, render};
pub use error::{LocationErrorKind, WeatherError};
pub use location::{GeolocationProvider, LocationProvider, PositionSource};
pub use model::{Coordinate, WeatherReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
