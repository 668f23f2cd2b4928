use tavili::prelude::*;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const BODY: &str = r#"{"12": {"fromlatlng": [32.07, 34.79], "tolatlng": [32.08, 34.80], "fromaddress": "Herzl 1"}}"#;

#[tokio::test]
async fn test_fetch_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deliveriesinrange"))
        .and(query_param("lat", "32.0695"))
        .and(query_param("lng", "34.7987"))
        .and(query_param("radius", "0.02"))
        .and(query_param("pointofinterest", "from"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = DeliveryQueryClient::new(HttpTransport::new(&server.uri()).unwrap());
    let mut log = LogPanel::default();
    let outcome = client
        .query_deliveries(
            &mut log,
            LatLng::new(32.0695, 34.7987),
            0.02,
            Some(Endpoint::From),
        )
        .await;

    assert!(!outcome.transport_failed);
    assert_eq!(outcome.deliveries.len(), 1);
    assert_eq!(outcome.deliveries[0].id.as_str(), "12");
    assert_eq!(outcome.deliveries[0].from_address.as_deref(), Some("Herzl 1"));
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_jsonp_body_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deliveriesinrange"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("callback({BODY});")))
        .mount(&server)
        .await;

    let client = DeliveryQueryClient::new(HttpTransport::new(&server.uri()).unwrap());
    let mut log = LogPanel::default();
    let outcome = client
        .query_deliveries(&mut log, LatLng::new(32.0695, 34.7987), 0.02, None)
        .await;

    assert_eq!(outcome.deliveries.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_logged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DeliveryQueryClient::new(HttpTransport::new(&server.uri()).unwrap());
    let mut log = LogPanel::default();
    let outcome = client
        .query_deliveries(&mut log, LatLng::new(32.0695, 34.7987), 0.02, None)
        .await;

    assert!(outcome.transport_failed);
    assert!(outcome.deliveries.is_empty());
    assert_eq!(log.len(), 1);
    let line = log.latest().unwrap();
    assert!(line.text.starts_with("Unable to retrieve deliveriesinrange"));
    assert!(line.text.contains("500"));
}

#[tokio::test]
async fn test_full_cycle_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/deliveriesinrange"))
        .and(query_param("pointofinterest", "to"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .mount(&server)
        .await;

    let mut config = ClientProfile::Recipient.resolve();
    config.query.base_url = format!("{}/api", server.uri());
    config.location.force_manual = true;

    let transport = HttpTransport::from_config(&config.query).unwrap();
    let client = DeliveryQueryClient::from_config(transport, &config.query);
    let resolver = GeolocationResolver::from_config(None, &config.location);
    let mut session = MapSession::new(config).unwrap();

    let summary = session
        .run_query_cycle(&resolver, &client)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.deliveries, 1);
    assert_eq!(session.annotations().len(), 2);
    assert_eq!(session.scene()["layers"].as_array().unwrap().len(), 4);
}
