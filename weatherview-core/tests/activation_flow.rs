//! End-to-end activation and search cycles against a mock OpenWeather server.

use weatherview_core::{
    ActivationPhase, Config, Coordinates, FixedPosition, IpGeolocator, Key, SearchField,
    WeatherViewModel, provider_from_config,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_json(name: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "dt": 1_700_000_000,
        "main": { "temp": temp, "feels_like": temp - 1.0, "humidity": 70 },
        "weather": [ { "main": "Rain", "description": "light rain", "icon": "10d" } ],
        "wind": { "speed": 12.4 }
    })
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: Some("TEST_KEY".into()),
        base_url: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn located_activation_requests_coordinates_in_imperial() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "40.71"))
        .and(query_param("lon", "-74"))
        .and(query_param("units", "imperial"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_json("New York", 71.6)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let mut vm = WeatherViewModel::new(provider_from_config(&cfg), cfg.fallback_location.clone());
    let geo = FixedPosition(Coordinates::new(40.71, -74.00));

    vm.activate(Some(&geo)).await;

    let reading = vm.state().reading.clone().expect("reading should be populated");
    assert!(!vm.state().loading);
    assert_eq!(reading.temperature_display(), "72°F");
    assert_eq!(reading.condition, "Rain");
}

#[tokio::test]
async fn unreachable_geolocation_falls_back_to_one_named_fetch() {
    let weather = MockServer::start().await;
    let ipapi = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&ipapi)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_json("New York", 60.0)))
        .expect(1)
        .mount(&weather)
        .await;

    let cfg = config_for(&weather);
    let mut vm = WeatherViewModel::new(provider_from_config(&cfg), cfg.fallback_location.clone());
    let geo = IpGeolocator::with_url(&ipapi.uri());

    vm.activate(Some(&geo)).await;

    assert_eq!(vm.phase(), ActivationPhase::Ready);
    assert_eq!(vm.state().reading.as_ref().map(|r| r.place_name.as_str()), Some("New York"));
}

#[tokio::test]
async fn not_found_leaves_no_reading_and_stops_loading() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let mut vm = WeatherViewModel::new(provider_from_config(&cfg), cfg.fallback_location.clone());
    let mut field = SearchField::new();
    field.set_text("Atlantis");

    assert!(vm.handle_key(&mut field, Key::Enter).await);

    assert_eq!(vm.phase(), ActivationPhase::Failed);
    assert!(!vm.state().loading);
    assert!(vm.state().reading.is_none());
    assert_eq!(field.text(), "");
}

#[tokio::test]
async fn search_after_activation_replaces_reading() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_json("New York", 50.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_json("Tokyo", 80.4)))
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let mut vm = WeatherViewModel::new(provider_from_config(&cfg), cfg.fallback_location.clone());

    vm.activate(None).await;
    vm.search("Tokyo").await;

    let reading = vm.state().reading.clone().expect("reading should be populated");
    assert_eq!(reading.place_name, "Tokyo");
    assert_eq!(reading.temperature_display(), "80°F");
    assert_eq!(reading.feels_like_display(), "79°F");
}
