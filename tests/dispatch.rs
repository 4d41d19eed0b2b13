//! Wire-level tests for the dispatcher's outcome mapping.
//!
//! Uses wiremock to pin every row of the status-to-envelope table, the
//! Location-header id extraction, decode degradation and the transport
//! failure classes.

use std::time::Duration;

use dojoapi::{DojoClient, NO_RESPONSE};
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> DojoClient {
    DojoClient::new(&server.uri(), "test-token", "admin").unwrap()
}

#[tokio::test]
async fn test_200_maps_to_success_with_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/findings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::GET, "findings/", None, None, None)
        .await;

    assert!(response.success);
    assert_eq!(response.message, "Success");
    assert_eq!(response.response_code, 200);
    assert_eq!(response.data, Some(json!({"count": 0, "results": []})));
}

#[tokio::test]
async fn test_201_with_location_header_extracts_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/products/"))
        .respond_with(
            ResponseTemplate::new(201)
                .append_header("Location", "https://host/api/v2/products/42/")
                .set_body_json(json!({"id": 42, "name": "Demo"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::POST, "products/", None, Some(json!({"name": "Demo"})), None)
        .await;

    assert!(response.success);
    assert_eq!(response.message, "Upload complete");
    assert_eq!(response.response_code, 201);
    assert_eq!(response.data, Some(json!(42)));
    assert_eq!(response.id().unwrap(), 42);
}

#[tokio::test]
async fn test_201_without_parseable_location_falls_back_to_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/products/"))
        .respond_with(
            ResponseTemplate::new(201)
                .append_header("Location", "https://host/api/v2/products/pending")
                .set_body_json(json!({"id": 9, "name": "Demo"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::POST, "products/", None, Some(json!({"name": "Demo"})), None)
        .await;

    assert!(response.success);
    assert_eq!(response.message, "Upload complete");
    assert_eq!(response.data, Some(json!({"id": 9, "name": "Demo"})));
}

#[tokio::test]
async fn test_204_maps_to_object_updated_without_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/users/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::DELETE, "users/7/", None, None, None)
        .await;

    assert!(response.success);
    assert_eq!(response.message, "Object updated.");
    assert_eq!(response.response_code, 204);
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_400_maps_to_failure_with_raw_text() {
    let server = MockServer::start().await;
    let body = r#"{"title":["required"]}"#;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/findings/5/"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::PATCH, "findings/5/", None, Some(json!({})), None)
        .await;

    assert!(!response.success);
    assert_eq!(response.message, "Error occurred in API.");
    assert_eq!(response.response_code, 400);
    assert_eq!(response.data, Some(Value::String(body.to_string())));
}

#[tokio::test]
async fn test_401_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client.dispatch(Method::GET, "users/", None, None, None).await;

    assert!(!response.success);
    assert_eq!(response.message, "Unauthorized.");
    assert_eq!(response.data, Some(Value::String("Invalid token".to_string())));
}

#[tokio::test]
async fn test_404_maps_to_missing_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/products/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found."))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::GET, "products/999/", None, None, None)
        .await;

    assert!(!response.success);
    assert_eq!(response.message, "Object id does not exist.");
    assert_eq!(response.response_code, 404);
}

#[tokio::test]
async fn test_414_maps_to_uri_too_large_without_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/findings/"))
        .respond_with(ResponseTemplate::new(414).set_body_string("URI too long"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .dispatch(Method::GET, "findings/", None, None, None)
        .await;

    assert!(!response.success);
    assert_eq!(response.message, "Request-URI Too Large.");
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_500_and_504_map_to_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/a/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/b/"))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let response = client.dispatch(Method::GET, "a/", None, None, None).await;
    assert!(!response.success);
    assert_eq!(response.message, "An error 500 occurred in the API.");
    assert_eq!(response.data, Some(Value::String("boom".to_string())));

    let response = client.dispatch(Method::GET, "b/", None, None, None).await;
    assert!(!response.success);
    assert_eq!(response.message, "An error 504 occurred in the API.");
    assert_eq!(response.response_code, 504);
}

#[tokio::test]
async fn test_unlisted_status_maps_to_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/roles/"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"queued": true})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client.dispatch(Method::GET, "roles/", None, None, None).await;

    assert!(response.success);
    assert_eq!(response.message, "Success");
    assert_eq!(response.response_code, 202);
    assert_eq!(response.data, Some(json!({"queued": true})));
}

#[tokio::test]
async fn test_undecodable_json_degrades_to_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client.dispatch(Method::GET, "users/", None, None, None).await;

    assert!(!response.success);
    assert_eq!(response.message, "JSON response could not be decoded.");
    assert_eq!(response.response_code, 200);
    assert_eq!(
        response.data,
        Some(Value::String("<html>not json</html>".to_string()))
    );
}

#[tokio::test]
async fn test_connection_failure_uses_sentinel_code() {
    // Port 9 (discard) is expected to refuse connections.
    let client = DojoClient::new("http://127.0.0.1:9", "token", "user").unwrap();
    let response = client.dispatch(Method::GET, "users/", None, None, None).await;

    assert!(!response.success);
    assert_eq!(response.message, "A connection error occurred.");
    assert_eq!(response.response_code, NO_RESPONSE);
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_timeout_reports_configured_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let client = DojoClient::builder(&server.uri(), "token", "user")
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let response = client.dispatch(Method::GET, "users/", None, None, None).await;

    assert!(!response.success);
    assert_eq!(response.message, "The request timed out after 1 seconds.");
    assert_eq!(response.response_code, NO_RESPONSE);
}

#[tokio::test]
async fn test_dispatch_is_idempotent_against_fixed_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let first = client.dispatch(Method::GET, "users/", None, None, None).await;
    let second = client.dispatch(Method::GET, "users/", None, None, None).await;

    assert_eq!(first.success, second.success);
    assert_eq!(first.message, second.message);
    assert_eq!(first.response_code, second.response_code);
}
