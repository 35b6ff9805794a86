//! Integration tests for the weather client using WireMock
//!
//! These tests mock the OpenWeatherMap endpoint to check how responses and
//! failures map onto the query error taxonomy.

use std::time::Duration;

use cityclock::api::{ClientConfig, WeatherClient};
use cityclock::error::QueryError;
use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn client_for(base_url: &str) -> WeatherClient {
    WeatherClient::new(
        ClientConfig::new("test-key")
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(500)),
    )
    .expect("client should build")
}

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{
            "id": 500,
            "main": "Rain",
            "description": "light rain",
            "icon": "10d"
        }],
        "main": { "temp": 18.4, "feels_like": 18.1, "humidity": 72, "pressure": 1012 },
        "wind": { "speed": 4.1, "deg": 240 },
        "sys": { "country": "FR" },
        "timezone": 7200,
        "name": "Paris",
        "cod": 200
    })
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn current_weather_parses_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server.uri())
        .current_weather("Paris")
        .await
        .expect("query should succeed");

    assert_eq!(result.display_name(), "Paris, FR");
    assert_eq!(result.temperature, 18.4);
    assert_eq!(result.humidity, 72);
    assert_eq!(result.wind_speed, 4.1);
    assert_eq!(result.condition, "Rain");
    assert_eq!(result.description, "Light Rain");
    assert_eq!(result.icon, "10d");
    assert_eq!(result.utc_offset_secs, 7200);
}

#[tokio::test]
async fn current_weather_sends_city_with_spaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server.uri()).current_weather("New York").await;
    assert!(result.is_ok());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server.uri()).current_weather("Qzxxxxx").await;
    assert_eq!(result, Err(QueryError::NotFound));
}

#[tokio::test]
async fn any_non_success_status_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client_for(&server.uri()).current_weather("Paris").await;
    assert_eq!(result, Err(QueryError::NotFound));
}

#[tokio::test]
async fn malformed_body_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server.uri()).current_weather("Paris").await;
    assert!(matches!(result, Err(QueryError::Unknown(_))), "got {result:?}");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paris_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client_for(&server.uri()).current_weather("Paris").await;
    assert_eq!(result, Err(QueryError::Timeout));
}

#[tokio::test]
async fn refused_connection_is_transport() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = client_for(&format!("http://127.0.0.1:{port}"))
        .current_weather("Paris")
        .await;
    assert!(matches!(result, Err(QueryError::Transport(_))), "got {result:?}");
}
