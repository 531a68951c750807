//! WeatherClient against a mocked OpenWeatherMap.

use city_wx::config::AppConfig;
use city_wx::error::WeatherError;
use city_wx::weather::{AqiLevel, SearchOutcome, WeatherClient, WeatherPayloads};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const AIR_PATH: &str = "/data/2.5/air_pollution";

fn client_for(server: &MockServer) -> WeatherClient {
    let config = AppConfig {
        api_key: "test-key".to_string(),
        weather_url: format!("{}{WEATHER_PATH}", server.uri()),
        forecast_url: format!("{}{FORECAST_PATH}", server.uri()),
        air_quality_url: format!("{}{AIR_PATH}", server.uri()),
        request_timeout_secs: 5,
        ..AppConfig::default()
    };
    WeatherClient::new(&config).unwrap()
}

fn london() -> serde_json::Value {
    json!({
        "cod": 200,
        "name": "London",
        "coord": { "lat": 51.51, "lon": -0.13 },
        "timezone": 3600,
        "main": { "temp": 15.4, "humidity": 72, "pressure": 1012 },
        "weather": [{ "description": "light rain", "icon": "10d" }],
        "wind": { "speed": 4.1 }
    })
}

fn forecast() -> serde_json::Value {
    json!({
        "cod": "200",
        "list": [
            {
                "dt": 1_714_564_800,
                "main": { "temp": 14.6 },
                "weather": [{ "description": "scattered clouds", "icon": "03d" }]
            }
        ]
    })
}

async fn mount_current(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_air(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(AIR_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

fn found(outcome: SearchOutcome) -> WeatherPayloads {
    match outcome {
        SearchOutcome::Found(payloads) => *payloads,
        other => panic!("expected a found city, got {other:?}"),
    }
}

#[tokio::test]
async fn search_sends_expected_queries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(AIR_PATH))
        .and(query_param("lat", "51.51"))
        .and(query_param("lon", "-0.13"))
        .and(query_param("appid", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "list": [{ "main": { "aqi": 3 } }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let payloads = found(client_for(&server).fetch("London").await.unwrap());

    let conditions = payloads.current.conditions();
    assert_eq!(conditions.location, "London");
    assert_eq!(conditions.temperature_label(), "15°C");
    assert_eq!(conditions.description_label(), "Light Rain");
    assert_eq!(conditions.utc_offset_secs, 3600);

    let air = payloads.air_quality.expect("air quality payload");
    assert_eq!(air.level(), Some(AqiLevel::Moderate));

    let forecast = payloads.forecast.expect("forecast payload");
    assert!(forecast.is_available());
    assert_eq!(forecast.list.len(), 1);
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    // Neither follow-up call should be made
    Mock::given(method("GET"))
        .and(path(AIR_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client_for(&server).fetch("Atlantis").await.unwrap();
    match outcome {
        SearchOutcome::NotFound { code, message } => {
            assert_eq!(code, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_key_is_reported_as_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "cod": 401, "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let outcome = client_for(&server).fetch("London").await.unwrap();
    assert!(matches!(outcome, SearchOutcome::NotFound { code: 401, .. }));
}

#[tokio::test]
async fn air_quality_error_body_has_no_level() {
    let server = MockServer::start().await;
    mount_current(&server, london()).await;
    mount_air(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({ "cod": 500, "message": "internal error" })),
    )
    .await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast())).await;

    let payloads = found(client_for(&server).fetch("London").await.unwrap());
    let level = payloads.air_quality.and_then(|air| air.level());
    assert_eq!(level, None);
    assert!(payloads.forecast.is_some());
}

#[tokio::test]
async fn undecodable_air_quality_degrades_to_none() {
    let server = MockServer::start().await;
    mount_current(&server, london()).await;
    mount_air(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast())).await;

    let payloads = found(client_for(&server).fetch("London").await.unwrap());
    assert!(payloads.air_quality.is_none());
    assert_eq!(payloads.current.name, "London");
}

#[tokio::test]
async fn forecast_with_error_code_is_unavailable() {
    let server = MockServer::start().await;
    mount_current(&server, london()).await;
    mount_air(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "list": [{ "main": { "aqi": 1 } }] })),
    )
    .await;
    mount_forecast(
        &server,
        ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
    )
    .await;

    let payloads = found(client_for(&server).fetch("London").await.unwrap());
    let forecast = payloads.forecast.expect("forecast payload");
    assert!(!forecast.is_available());
    assert!(forecast.list.is_empty());
}

#[tokio::test]
async fn malformed_current_weather_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
    assert!(err.dialog_message().starts_with("Failed to fetch weather data: "));
}

#[tokio::test]
async fn unreachable_provider_is_a_connection_error() {
    let config = AppConfig {
        api_key: "test-key".to_string(),
        weather_url: "http://127.0.0.1:9/data/2.5/weather".to_string(),
        request_timeout_secs: 2,
        ..AppConfig::default()
    };
    let client = WeatherClient::new(&config).unwrap();

    let err = client.fetch("London").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::ConnectionFailed(_) | WeatherError::Timeout
    ));
}
