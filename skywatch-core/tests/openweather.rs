//! Integration tests for the OpenWeather provider using wiremock.

use skywatch_core::{
    Coordinates, WeatherError, WeatherProvider, provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_weather(name: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": temp, "feels_like": temp, "humidity": 52},
        "visibility": 10000,
        "wind": {"speed": 5.14},
        "dt": 1760900000,
        "sys": {"country": "FR"},
        "name": name
    })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_base_url(format!("{}/data/2.5/", server.uri()))
        .with_provider_host(server.uri())
}

#[tokio::test]
async fn weather_by_coords_sends_metric_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "metric"))
        .and(query_param("APPID", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("Paris", 23.4)))
        .expect(1)
        .mount(&server)
        .await;

    let conditions = provider_for(&server)
        .weather_by_coords(Coordinates::new(48.85, 2.35))
        .await
        .unwrap();

    assert_eq!(conditions.name, "Paris");
    assert_eq!(conditions.country, "FR");
    assert_eq!(conditions.temperature_c, 23.4);
    assert_eq!(conditions.condition_main, "Clear");
}

#[tokio::test]
async fn weather_by_city_reads_detail_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("Paris", 17.0)))
        .mount(&server)
        .await;

    let conditions = provider_for(&server).weather_by_city("Paris").await.unwrap();

    assert_eq!(conditions.visibility, Some(10000.0));
    assert_eq!(conditions.wind_speed, Some(5.14));
    assert_eq!(conditions.icon_code, "01d");
    assert_eq!(conditions.description, "clear sky");
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server).weather_by_city("Zzzxx").await.unwrap_err();

    match err {
        WeatherError::NotFound(message) => assert_eq!(message, "city not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = provider_for(&server).weather_by_city("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::Status { status: 401, .. }));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": 3"))
        .mount(&server)
        .await;

    let err = provider_for(&server).weather_by_city("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn suggestions_use_find_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/find"))
        .and(query_param("q", "Lon"))
        .and(query_param("type", "like"))
        .and(query_param("sort", "population"))
        .and(query_param("cnt", "10"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "like",
            "cod": "200",
            "count": 3,
            "list": [
                {"id": 2643743, "name": "London"},
                {"id": 5367815, "name": "Long Beach"},
                {"id": 1264773, "name": "Lonavala"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = provider_for(&server).suggest_cities("Lon").await.unwrap();

    assert_eq!(names, ["London", "Long Beach", "Lonavala"]);
}

#[tokio::test]
async fn suggestion_limit_is_configurable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/find"))
        .and(query_param("cnt", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
        .expect(1)
        .mount(&server)
        .await;

    let names = provider_for(&server)
        .with_suggestion_limit(3)
        .suggest_cities("Ber")
        .await
        .unwrap();

    assert!(names.is_empty());
}
