//! Integration tests for OpenWeatherProvider using wiremock.

use citysky_core::{
    Endpoints, LookupError, WeatherQuery, WeatherService, provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_endpoints(
        "TEST_KEY".to_string(),
        Endpoints {
            geocoding_url: format!("{}/geo/1.0/direct", server.uri()),
            weather_url: format!("{}/data/2.5/weather", server.uri()),
        },
    )
}

fn current_weather(name: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10n" }],
        "main": { "temp": 7.43, "feels_like": 4.9, "pressure": 1012, "humidity": 88 },
        "sys": { "country": "GB", "sunrise": 1_700_031_000, "sunset": 1_700_063_000 },
        "name": name,
        "cod": 200
    })
}

#[tokio::test]
async fn suggest_sends_query_limit_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lond"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "London", "country": "GB", "state": "England", "lat": 51.5073, "lon": -0.1276,
              "local_names": { "en": "London" } },
            { "name": "London", "country": "CA", "state": "Ontario", "lat": 42.9832, "lon": -81.2433 },
            { "name": "Londonderry", "country": "GB", "lat": 54.9966, "lon": -7.3086 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let suggestions = provider(&server).suggest("Lond", 5).await.unwrap();

    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].label(), "London, GB, England");
    assert_eq!(suggestions[1].label(), "London, CA, Ontario");
    assert_eq!(suggestions[2].state, None);
    assert_eq!(suggestions[2].label(), "Londonderry, GB");
}

#[tokio::test]
async fn suggest_never_returns_more_than_limit() {
    let server = MockServer::start().await;

    let places: Vec<_> = (0..8)
        .map(|i| serde_json::json!({ "name": format!("Springfield {i}"), "country": "US", "lat": 39.0, "lon": -89.0 }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(places))
        .mount(&server)
        .await;

    let suggestions = provider(&server).suggest("Springfield", 5).await.unwrap();
    assert_eq!(suggestions.len(), 5);
}

#[tokio::test]
async fn suggest_reports_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&server)
        .await;

    let err = provider(&server).suggest("Lond", 5).await.unwrap_err();
    assert!(matches!(err, LookupError::Service { .. }));
    assert!(err.to_string().contains("401"), "Error should mention status: {err}");
}

#[tokio::test]
async fn weather_by_name_uses_metric_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "london"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("London")))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .current_weather(&WeatherQuery::ByName("london".into()))
        .await
        .unwrap();

    assert_eq!(result.name, "London");
    assert_eq!(result.condition, "Rain");
    assert_eq!(result.description, "light rain");
    assert_eq!(result.temperature_c, 7.43);
    assert_eq!(result.feels_like_c, 4.9);
    assert_eq!(result.sunset.timestamp(), 1_700_063_000);
    assert_eq!(result.icon_url(), "https://openweathermap.org/img/wn/10n@2x.png");
}

#[tokio::test]
async fn weather_by_coords_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.8566"))
        .and(query_param("lon", "2.3522"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather("Paris")))
        .expect(1)
        .mount(&server)
        .await;

    let query = WeatherQuery::ByCoords { lat: 48.8566, lon: 2.3522, label: "Paris, FR".into() };
    let result = provider(&server).current_weather(&query).await.unwrap();

    assert_eq!(result.name, "Paris");
}

#[tokio::test]
async fn weather_not_found_carries_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .current_weather(&WeatherQuery::ByName("Atlantis".into()))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "city not found");
}

#[tokio::test]
async fn weather_error_without_message_uses_generic_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .current_weather(&WeatherQuery::ByName("London".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Service { message: None, .. }));
    assert_eq!(err.user_message(), "City not found");
}

#[tokio::test]
async fn weather_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "London" })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .current_weather(&WeatherQuery::ByName("London".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Parse(_)));
}
