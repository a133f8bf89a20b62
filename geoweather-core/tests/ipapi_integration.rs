//! Integration tests for IP-based geolocation using wiremock.

use std::sync::Arc;
use std::time::Duration;

use geoweather_core::location::{IpApiSource, Position, PositionError, PositionOptions};
use geoweather_core::{Coordinate, GeolocationProvider, LocationProvider, PositionSource};
use tokio::sync::oneshot;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Drive the callback API directly so custom options can be passed.
async fn request(source: &IpApiSource, options: PositionOptions) -> Result<Position, PositionError> {
    let (ok_tx, ok_rx) = oneshot::channel();
    let (err_tx, err_rx) = oneshot::channel();

    source.get_current_position(
        Box::new(move |pos| {
            let _ = ok_tx.send(pos);
        }),
        Box::new(move |err| {
            let _ = err_tx.send(err);
        }),
        options,
    );

    tokio::select! {
        Ok(pos) = ok_rx => Ok(pos),
        Ok(err) = err_rx => Err(err),
    }
}

#[tokio::test]
async fn test_lookup_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .and(query_param("fields", "status,message,lat,lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 52.5196,
            "lon": 13.4069
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = IpApiSource::new(format!("{}/json/", mock_server.uri()));
    let provider = GeolocationProvider::new(Arc::new(source));

    let coord = provider.get_current_location().await.unwrap();
    assert_eq!(coord, Coordinate::new(52.5196, 13.4069));
}

#[tokio::test]
async fn test_lookup_fail_status_is_position_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .mount(&mock_server)
        .await;

    let source = IpApiSource::new(format!("{}/json/", mock_server.uri()));
    let provider = GeolocationProvider::new(Arc::new(source));

    let err = provider.get_current_location().await.unwrap_err();
    assert_eq!(err.to_string(), "Location information unavailable");
}

#[tokio::test]
async fn test_rate_limited_is_position_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let source = IpApiSource::new(format!("{}/json/", mock_server.uri()));
    let err = request(&source, PositionOptions::default()).await.unwrap_err();

    assert_eq!(err.code, geoweather_core::error::POSITION_UNAVAILABLE);
    assert!(err.message.contains("429"));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "success", "lat": 1.0, "lon": 2.0 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let source = IpApiSource::new(format!("{}/json/", mock_server.uri()));
    let options = PositionOptions { timeout: Duration::from_millis(100), enable_high_accuracy: true };

    let err = request(&source, options).await.unwrap_err();
    assert_eq!(err.code, geoweather_core::error::TIMEOUT);
}

#[tokio::test]
async fn test_missing_coordinates_is_position_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success"
        })))
        .mount(&mock_server)
        .await;

    let source = IpApiSource::new(format!("{}/json/", mock_server.uri()));
    let err = request(&source, PositionOptions::default()).await.unwrap_err();

    assert_eq!(err.code, geoweather_core::error::POSITION_UNAVAILABLE);
}
