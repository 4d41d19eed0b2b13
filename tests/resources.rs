//! End-to-end tests for the resource methods against a fixture backend.

use chrono::NaiveDate;
use dojoapi::{
    DojoClient, EngagementUpdate, NewProduct, ScanUpload, Severity, TestUpdate, UserQuery,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_users_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .and(query_param("limit", "20000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"count": 1, "results": [{"id": 7, "username": "alice"}]}),
        ))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.list_users(&UserQuery::default()).await;

    assert!(response.success);
    assert_eq!(response.count(), Some(1));
    assert_eq!(response.results().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_create_product_scenario_extracts_created_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/products/"))
        .and(body_json(json!({
            "name": "Demo",
            "description": "d",
            "prod_type": 1,
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .append_header("Location", "https://host/api/v2/products/42/"),
        )
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.create_product(&NewProduct::new("Demo", "d", 1)).await;

    assert!(response.success);
    assert_eq!(response.data, Some(json!(42)));
    assert_eq!(response.id().unwrap(), 42);
}

#[tokio::test]
async fn test_delete_user_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/users/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.delete_user(7).await;

    assert!(response.success);
    assert_eq!(response.message, "Object updated.");
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_patch_finding_rejection_carries_raw_text() {
    let server = MockServer::start().await;
    let body = r#"{"title":["required"]}"#;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/findings/5/"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.patch_finding(5, &Default::default()).await;

    assert!(!response.success);
    assert_eq!(response.data, Some(Value::String(body.to_string())));
    assert!(response.id().is_err());
}

#[tokio::test]
async fn test_get_user_id_by_name_projects_matching_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [
                {"id": 3, "username": "alice-bot"},
                {"id": 7, "username": "alice"},
            ],
        })))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    assert_eq!(client.get_user_id_by_name("alice").await, Some(7));
    assert_eq!(client.get_user_id_by_name("carol").await, None);
}

#[tokio::test]
async fn test_close_engagement_posts_to_close_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/engagements/12/close/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client.close_engagement(12).await;

    assert!(response.success);
}

#[tokio::test]
async fn test_update_engagement_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/engagements/12/"))
        .and(body_json(json!({"status": "Completed", "active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let update = EngagementUpdate {
        status: Some("Completed".to_string()),
        active: Some(false),
        ..Default::default()
    };
    let response = client.update_engagement(12, &update).await;

    assert!(response.success);
}

#[tokio::test]
async fn test_update_test_backfills_target_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tests/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "target_start": "2026-01-01",
            "target_end": "2026-02-01",
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/tests/5/"))
        .and(body_json(json!({
            "environment": 3,
            "target_start": "2026-01-01",
            "target_end": "2026-02-01",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let update = TestUpdate {
        environment: Some(3),
        ..Default::default()
    };
    let response = client.update_test(5, &update).await;

    assert!(response.success);
}

#[tokio::test]
async fn test_create_finding_derives_numerical_severity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/findings/"))
        .respond_with(
            ResponseTemplate::new(201)
                .append_header("Location", "https://host/api/v2/findings/99/"),
        )
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let finding = dojoapi::NewFinding::new(
        "SQLi in login",
        "Parameter q is injectable",
        Severity::High,
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        1,
        2,
        3,
        4,
    );
    let response = client.create_finding(&finding).await;
    assert_eq!(response.id().unwrap(), 99);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["severity"], "High");
    assert_eq!(body["numerical_severity"], "S3");
}

#[tokio::test]
async fn test_accept_risks_sends_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/findings/accept_risks/"))
        .and(body_json(json!([
            {"vulnerability_id": "CVE-2026-0001", "accepted_by": "bob"},
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let acceptance = dojoapi::RiskAcceptance {
        vulnerability_id: Some("CVE-2026-0001".to_string()),
        justification: None,
        accepted_by: Some("bob".to_string()),
    };
    let response = client.accept_risks(&[acceptance]).await;

    assert!(response.success);
}

#[tokio::test]
async fn test_upload_scan_sends_multipart_without_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/import-scan/"))
        .respond_with(
            ResponseTemplate::new(201)
                .append_header("Location", "https://host/api/v2/tests/11/"),
        )
        .mount(&server)
        .await;

    let scan_path = std::env::temp_dir().join("dojoapi-test-scan.xml");
    std::fs::write(&scan_path, b"<scan><finding/></scan>").unwrap();

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let mut upload = ScanUpload::new(
        4,
        "ZAP Scan",
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
    );
    upload.file = Some(scan_path.clone());
    upload.tags = Some("nightly".to_string());
    let response = client.upload_scan(&upload).await.unwrap();

    assert!(response.success);
    assert_eq!(response.id().unwrap(), 11);

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(request.headers.get("accept").is_none());

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="engagement""#));
    assert!(body.contains(r#"name="scan_type""#));
    assert!(body.contains("ZAP Scan"));
    assert!(body.contains(r#"name="minimum_severity""#));
    assert!(body.contains("Low"));
    assert!(body.contains(r#"name="tags""#));
    assert!(body.contains(r#"filename="dojoapi-test-scan.xml""#));
    assert!(body.contains("<scan><finding/></scan>"));

    std::fs::remove_file(&scan_path).ok();
}

#[tokio::test]
async fn test_upload_build_details_sends_payload_as_file_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/build_details/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    let response = client
        .upload_build_details(4, r#"{"commit": "abc123"}"#)
        .await;

    assert!(response.success);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="engagement""#));
    assert!(body.contains(r#"{"commit": "abc123"}"#));
}

#[tokio::test]
async fn test_get_last_test_id_probes_count_then_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tests/"))
        .and(query_param("limit", "1"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"count": 3, "results": [{"id": 31}]}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tests/"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"count": 3, "results": [{"id": 29}]}),
        ))
        .mount(&server)
        .await;

    let client = DojoClient::new(&server.uri(), "t", "u").unwrap();
    assert_eq!(client.get_last_test_id(8).await, Some(31));
}
