use std::time::Duration;

use chrono::{Datelike, Timelike};
use forecast_engine::{FailureKind, FetchSettings, OpenWeatherFetcher, Units, WeatherFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORECAST_BODY: &str = r#"{
  "cod": "200",
  "list": [
    {"dt": 1717200000, "main": {"temp": 12.5, "temp_min": 10.0, "temp_max": 14.0, "humidity": 81},
     "weather": [{"id": 500, "main": "Rain", "description": "light rain"}]},
    {"dt": 1717210800, "main": {"temp": 15.0, "temp_min": 13.2, "temp_max": 16.1, "humidity": 70},
     "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]}
  ]
}"#;

const CURRENT_BODY: &str = r#"{
  "name": "Oslo",
  "coord": {"lat": 59.9127, "lon": 10.7461},
  "dt": 1717243200,
  "main": {"temp": 18.3, "temp_min": 16.0, "temp_max": 20.4, "humidity": 55},
  "weather": [{"id": 801, "main": "Clouds", "description": "few clouds"}]
}"#;

fn settings_for(server: &MockServer) -> FetchSettings {
    FetchSettings {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..FetchSettings::default()
    }
}

#[tokio::test]
async fn weekly_forecast_sends_expected_parameters_and_decodes_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Oslo"))
        .and(query_param("mode", "json"))
        .and(query_param("units", "metric"))
        .and(query_param("APPID", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FORECAST_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = OpenWeatherFetcher::new(settings_for(&server)).expect("client");
    let entries = fetcher.weekly_forecast("Oslo").await.expect("forecast ok");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].summary, "Rain");
    assert_eq!(entries[0].description, "light rain");
    assert_eq!(entries[0].high, 14.0);
    assert_eq!(entries[0].low, 10.0);
    assert_eq!(entries[1].humidity, 70);
    assert_eq!(entries[0].timestamp.day(), 1);
    assert_eq!(entries[0].timestamp.month(), 6);
}

#[tokio::test]
async fn query_text_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "São Paulo, BR"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"list":[]}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = OpenWeatherFetcher::new(settings_for(&server)).expect("client");
    let entries = fetcher.weekly_forecast("São Paulo, BR").await.expect("forecast ok");

    assert!(entries.is_empty());
}

#[tokio::test]
async fn imperial_units_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = FetchSettings {
        units: Units::Imperial,
        ..settings_for(&server)
    };
    let fetcher = OpenWeatherFetcher::new(settings).expect("client");

    fetcher.current_weather("Oslo").await.expect("current ok");
}

#[tokio::test]
async fn current_weather_decodes_location_and_readings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = OpenWeatherFetcher::new(settings_for(&server)).expect("client");
    let current = fetcher.current_weather("Oslo").await.expect("current ok");

    assert_eq!(current.location, "Oslo");
    assert_eq!(current.coordinate.latitude, 59.9127);
    assert_eq!(current.coordinate.longitude, 10.7461);
    assert_eq!(current.temperature, 18.3);
    assert_eq!(current.high, 20.4);
    assert_eq!(current.low, 16.0);
    assert_eq!(current.humidity, 55);
    assert_eq!(current.summary, "Clouds");
    assert_eq!(current.observed_at.hour(), 12);
}

#[tokio::test]
async fn unknown_city_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = OpenWeatherFetcher::new(settings_for(&server)).expect("client");
    let err = fetcher.weekly_forecast("Nowhere").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn malformed_body_maps_to_parsing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"name\": 42", "application/json"))
        .mount(&server)
        .await;

    let fetcher = OpenWeatherFetcher::new(settings_for(&server)).expect("client");
    let err = fetcher.current_weather("Oslo").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Parsing);
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(FORECAST_BODY, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let fetcher = OpenWeatherFetcher::new(settings).expect("client");
    let err = fetcher.weekly_forecast("Oslo").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .insert_header("Content-Length", "11")
                .set_body_string(r#"{"list":[]}"#),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..settings_for(&server)
    };
    let fetcher = OpenWeatherFetcher::new(settings).expect("client");
    let err = fetcher.weekly_forecast("Oslo").await.unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn unreachable_host_maps_to_network() {
    let settings = FetchSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..FetchSettings::default()
    };
    let fetcher = OpenWeatherFetcher::new(settings).expect("client");
    let err = fetcher.weekly_forecast("Oslo").await.unwrap_err();

    assert!(matches!(
        err.kind,
        FailureKind::Network | FailureKind::Timeout
    ));
}
