//! Integration tests for OpenWeatherMapClient using wiremock.

use std::time::Duration;

use meteo_core::{UpstreamError, WeatherResult, lookup};
use meteo_reqwest::{OpenWeatherMapClient, TransportError, WeatherQuery, WeatherUpstream};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenWeatherMapClient {
    OpenWeatherMapClient::builder()
        .api_key("dummyApiKey")
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Test 1: request shape - city, key and metric units are sent as query params
#[tokio::test]
async fn test_request_carries_city_key_and_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "dummyApiKey"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": { "temp": 15.0 },
            "weather": [{ "description": "clear sky" }],
            "cod": 200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = WeatherQuery::new("London").unwrap();

    let body = client.fetch_raw(&query).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["main"]["temp"], 15.0);
}

/// Test 2: body is returned verbatim, even when empty
#[tokio::test]
async fn test_empty_body_is_returned_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = WeatherQuery::new("London").unwrap();

    assert_eq!(client.fetch_raw(&query).await.unwrap(), "");

    // ...and the interpreter turns it into a hard failure
    let error = lookup(&client, &query).await.unwrap_err();
    assert!(matches!(error, UpstreamError::EmptyResponse));
}

/// Test 3: provider 404 is not a transport failure, the body decides
#[tokio::test]
async fn test_provider_not_found_body_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "InvalidCity"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = WeatherQuery::new("InvalidCity").unwrap();

    let error = lookup(&client, &query).await.unwrap_err();
    match error {
        UpstreamError::NotFound { code, message } => {
            assert_eq!(code, "404");
            assert_eq!(message.as_deref(), Some("city not found"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

/// Test 4: slow provider trips the timeout
#[tokio::test]
async fn test_slow_provider_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = OpenWeatherMapClient::builder()
        .api_key("dummyApiKey")
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let query = WeatherQuery::new("London").unwrap();

    let error = client.fetch_raw(&query).await.unwrap_err();
    assert!(
        matches!(error, TransportError::Timeout(_)),
        "expected timeout, got {error:?}"
    );
}

/// Test 5: unreachable provider is a connect failure, and the key does not leak
#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = OpenWeatherMapClient::builder()
        .api_key("super-secret")
        .base_url(uri)
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let query = WeatherQuery::new("London").unwrap();

    let error = lookup(&client, &query).await.unwrap_err();
    assert!(matches!(error, UpstreamError::Transport(_)));

    let mut chain = vec![error.to_string()];
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    assert!(
        chain.iter().all(|message| !message.contains("super-secret")),
        "api key leaked: {chain:?}"
    );
}

/// Test 6: repeated lookups with identical upstream behaviour are identical
#[tokio::test]
async fn test_repeated_lookups_are_identical() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": { "temp": 9.25 },
            "weather": [{ "description": "overcast clouds" }],
            "cod": 200
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = WeatherQuery::new("Paris").unwrap();

    let mut results = Vec::new();
    for _ in 0..3 {
        results.push(lookup(&client, &query).await.unwrap());
    }
    assert!(
        results
            .iter()
            .all(|result| *result == WeatherResult::new(9.25, "overcast clouds"))
    );
}

/// Test 7: a body that is not UTF-8 is a transport failure, not a garbled success
#[tokio::test]
async fn test_non_utf8_body_is_body_error() {
    let mock_server = MockServer::start().await;

    let mut body = br#"{"main":{"temp":1.0},"weather":[{"description":""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(br#""}],"cod":200}"#);

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = WeatherQuery::new("London").unwrap();

    let error = client.fetch_raw(&query).await.unwrap_err();
    assert!(
        matches!(error, TransportError::Body(_)),
        "expected body error, got {error:?}"
    );

    let error = lookup(&client, &query).await.unwrap_err();
    assert!(matches!(
        error,
        UpstreamError::Transport(TransportError::Body(_))
    ));
}

/// Test 8: a shared reqwest client is used as given
#[tokio::test]
async fn test_shared_http_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": { "temp": 3.0 },
            "weather": [{ "description": "fog" }],
            "cod": 200
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let first = OpenWeatherMapClient::builder()
        .api_key("dummyApiKey")
        .base_url(mock_server.uri())
        .client(http.clone())
        .build()
        .unwrap();
    let second = OpenWeatherMapClient::builder()
        .api_key("dummyApiKey")
        .base_url(mock_server.uri())
        .client(http)
        .build()
        .unwrap();
    let query = WeatherQuery::new("Oslo").unwrap();

    for client in [&first, &second] {
        assert_eq!(
            lookup(client, &query).await.unwrap(),
            WeatherResult::new(3.0, "fog")
        );
    }
}
