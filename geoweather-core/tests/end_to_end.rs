//! Full attempts through WeatherApp with real providers against a mock server.

use std::sync::Arc;

use geoweather_core::location::FixedSource;
use geoweather_core::{
    Config, Coordinate, GeolocationProvider, ViewState, WeatherApp, provider::provider_from_config,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn report_body() -> serde_json::Value {
    serde_json::json!({
        "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 21.4, "feels_like": 20.9, "humidity": 40, "pressure": 1018 },
        "wind": { "speed": 2.1 },
        "name": "Berlin"
    })
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: Some("KEY".into()),
        weather_base_url: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_fixed_location_loads_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "52.52"))
        .and(query_param("lon", "13.405"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let location = GeolocationProvider::new(Arc::new(FixedSource::new(Coordinate::new(52.52, 13.405))));
    let weather = provider_from_config(&config_for(&mock_server));
    let app = WeatherApp::new(Arc::new(location), Arc::new(weather));

    let state = app.load().await;
    assert!(matches!(state, ViewState::Loaded(ref r) if r.name == "Berlin"));
    assert!(state.to_string().contains("Berlin"));

    let state = app.retry().await;
    assert!(matches!(state, ViewState::Loaded(_)));
}

#[tokio::test]
async fn test_unsupported_location_never_calls_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let weather = provider_from_config(&config_for(&mock_server));
    let app = WeatherApp::new(Arc::new(GeolocationProvider::unsupported()), Arc::new(weather));

    let state = app.load().await;
    assert_eq!(state, ViewState::Error("Geolocation is not supported by your browser".into()));
}

#[tokio::test]
async fn test_api_error_becomes_error_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let location = GeolocationProvider::new(Arc::new(FixedSource::new(Coordinate::new(0.0, 0.0))));
    let weather = provider_from_config(&config_for(&mock_server));
    let app = WeatherApp::new(Arc::new(location), Arc::new(weather));

    let state = app.load().await;
    assert_eq!(state, ViewState::Error("Invalid API key".into()));
    assert!(state.to_string().contains("[Try Again]"));
}
