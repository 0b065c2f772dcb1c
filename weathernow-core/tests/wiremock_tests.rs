//! HTTP client behaviour against a mock server.

use weathernow_core::{
    ForecastClient, GeolocationConfig, Geocoder, Geolocator, LookupError, OpenMeteoForecast,
    OpenMeteoGeocoder,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn geocoder(server: &MockServer) -> OpenMeteoGeocoder {
    OpenMeteoGeocoder::new(format!("{}/v1/search", server.uri()), 5).expect("client")
}

fn forecaster(server: &MockServer) -> OpenMeteoForecast {
    OpenMeteoForecast::new(format!("{}/v1/forecast", server.uri()), 10, 5).expect("client")
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn geocode_takes_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "San José"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "San José", "country": "Costa Rica", "latitude": 9.93, "longitude": -84.08},
                {"name": "San Jose", "country": "United States", "latitude": 37.34, "longitude": -121.89}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let place = geocoder(&server).resolve(" San José ").await.expect("place");
    assert_eq!(place.name, "San José");
    assert_eq!(place.country.as_deref(), Some("Costa Rica"));
    assert_eq!(place.latitude, 9.93);
    assert_eq!(place.longitude, -84.08);
}

#[tokio::test]
async fn geocode_result_without_country() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"name": "Null Island", "latitude": 0.0, "longitude": 0.0}]
        })))
        .mount(&server)
        .await;

    let place = geocoder(&server).resolve("null island").await.expect("place");
    assert!(place.country.is_none());
    assert_eq!(place.label(), "Null Island");
}

#[tokio::test]
async fn geocode_missing_or_empty_results_is_not_found() {
    for body in [serde_json::json!({"generationtime_ms": 0.2}), serde_json::json!({"results": []})] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Qwxyz").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound), "got {err:?}");
    }
}

#[tokio::test]
async fn geocode_empty_query_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let err = geocoder(&server).resolve("  ").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidInput));
}

#[tokio::test]
async fn geocode_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Berlin").await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn geocode_malformed_json_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Berlin").await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_sends_fixed_params_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "auto"))
        .and(query_param("daily", "temperature_2m_max,temperature_2m_min,precipitation_sum"))
        .and(query_param("forecast_days", "10"))
        .and(query_param("current_weather", "true"))
        .and(query_param("wind_speed_unit", "ms"))
        .and(query_param("latitude", "52.52"))
        .and(query_param("longitude", "13.41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 52.52,
            "longitude": 13.42,
            "current_weather": {"temperature": 21.5, "windspeed": 3.2, "winddirection": 180},
            "daily": {
                "time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max": [10, 12],
                "temperature_2m_min": [2, 3],
                "precipitation_sum": [0.0, 1.2]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = forecaster(&server).fetch(52.52, 13.41).await.expect("report");

    let current = report.current.expect("current");
    assert_eq!(current.temperature_c, 21.5);
    assert_eq!(current.wind_speed_mps, 3.2);

    let daily = report.daily.expect("daily");
    assert_eq!(daily.dates, vec!["2024-01-01", "2024-01-02"]);
    assert_eq!(daily.temp_max, vec![10.0, 12.0]);
    assert_eq!(daily.temp_min, vec![2.0, 3.0]);
    assert_eq!(daily.precipitation_sum, Some(vec![0.0, 1.2]));
    assert_eq!(daily.date_labels(), vec!["Jan 1", "Jan 2"]);
}

#[tokio::test]
async fn forecast_without_sections_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"latitude": 1.0})))
        .mount(&server)
        .await;

    let report = forecaster(&server).fetch(1.0, 2.0).await.expect("report");
    assert!(report.current.is_none());
    assert!(report.daily.is_none());
}

#[tokio::test]
async fn forecast_bad_request_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°."
        })))
        .mount(&server)
        .await;

    let err = forecaster(&server).fetch(123.0, 0.0).await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(ref msg) if msg.contains("Latitude")));
}

// ============================================================================
// Geolocation
// ============================================================================

fn geolocation_config(server: &MockServer) -> GeolocationConfig {
    GeolocationConfig { url: format!("{}/json", server.uri()), ..Default::default() }
}

#[tokio::test]
async fn ip_geolocation_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success", "city": "Lisbon", "lat": 38.72, "lon": -9.14
        })))
        .mount(&server)
        .await;

    let query = Geolocator::from_config(&geolocation_config(&server))
        .expect("client")
        .detect()
        .await
        .expect("position");
    assert_eq!(query.label, "Your location");
    assert_eq!(query.latitude, 38.72);
    assert_eq!(query.longitude, -9.14);
}

#[tokio::test]
async fn ip_geolocation_failure_status_is_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail", "message": "reserved range"
        })))
        .mount(&server)
        .await;

    let err = Geolocator::from_config(&geolocation_config(&server))
        .expect("client")
        .detect()
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::PermissionDenied));
}

#[tokio::test]
async fn ip_geolocation_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "success", "lat": 1.0, "lon": 2.0}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = GeolocationConfig { timeout_secs: 1, ..geolocation_config(&server) };
    let err = Geolocator::from_config(&config).expect("client").detect().await.unwrap_err();
    assert!(matches!(err, LookupError::Timeout));
}
