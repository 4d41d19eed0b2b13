//! Tests for request construction: authentication header schemes,
//! user agent, content negotiation and query rendering.

use dojoapi::{DojoClient, UserQuery};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_catch_all(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_auth_scheme_for_v2() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::new(&server.uri(), "abc123", "alice").unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap();
    assert_eq!(auth.to_str().unwrap(), "Token abc123");
}

#[tokio::test]
async fn test_apikey_auth_scheme_for_v1() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::builder(&server.uri(), "abc123", "alice")
        .api_version("v1")
        .build()
        .unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap();
    assert_eq!(auth.to_str().unwrap(), "ApiKey alice:abc123");

    // The version tag also selects the URL segment.
    assert!(requests[0].url.path().starts_with("/api/v1/"));
}

#[tokio::test]
async fn test_apikey_scheme_holds_for_empty_credentials() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::builder(&server.uri(), "", "")
        .api_version("v1")
        .build()
        .unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap();
    assert_eq!(auth.to_str().unwrap(), "ApiKey :");
}

#[tokio::test]
async fn test_default_user_agent_carries_crate_version() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("dojoapi/"));
}

#[tokio::test]
async fn test_custom_user_agent_overrides_default() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::builder(&server.uri(), "t", "u")
        .user_agent("security-pipeline/2.0")
        .build()
        .unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap();
    assert_eq!(agent.to_str().unwrap(), "security-pipeline/2.0");
}

#[tokio::test]
async fn test_json_headers_sent_for_plain_requests() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    client.dispatch(Method::GET, "users/", None, None, None).await;

    let requests = server.received_requests().await.unwrap();
    let accept = requests[0].headers.get("accept").unwrap();
    assert_eq!(accept.to_str().unwrap(), "application/json");
    let content_type = requests[0].headers.get("content-type").unwrap();
    assert_eq!(content_type.to_str().unwrap(), "application/json");
}

#[tokio::test]
async fn test_query_struct_renders_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .and(query_param("limit", "20000"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let query = UserQuery {
        username: Some("alice".to_string()),
        ..Default::default()
    };
    let response = client.list_users(&query).await;

    assert!(response.success);
}

#[tokio::test]
async fn test_body_is_serialized_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/product_types/"))
        .and(wiremock::matchers::body_json(json!({"name": "web"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "web"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.create_product_type("web").await;

    assert!(response.success);
}
