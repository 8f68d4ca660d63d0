use crma_api_client::{ClientConfig, ConnectionInfo, CrmaClient, CrmaError, CrmaResult, RetryPolicy};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a client pointed at the mock server
fn create_test_client(server: &MockServer) -> CrmaResult<CrmaClient> {
    let config = ClientConfig {
        retry: RetryPolicy::new(3, Duration::from_millis(10))?,
        ..ClientConfig::default()
    };
    CrmaClient::with_config(ConnectionInfo::new(server.uri(), "test-token"), config)
}

fn user() -> Value {
    json!({"id": "u1", "name": "A", "profilePhotoUrl": "p"})
}

fn version() -> Value {
    json!({
        "id": "v1",
        "url": "/y",
        "type": "t",
        "totalRowCount": 3,
        "createdDate": "2020-01-01T00:00:00Z",
        "createdBy": user(),
        "lastModifiedDate": "2020-01-02T00:00:00Z",
        "lastModifiedBy": user(),
        "dataset": {"id": "DS1", "url": "/z"},
    })
}

/// Test listing the versions of a dataset
#[tokio::test]
async fn test_list_dataset_versions() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v54.0/wave/datasets/DS1/versions"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "/x", "versions": [version()]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let response = client.datasets().list_dataset_versions("DS1")
        .await
        .expect("Failed to list dataset versions");

    assert_eq!(response.url, "/x");
    assert_eq!(response.versions.len(), 1);
    assert_eq!(response.versions[0].total_row_count, 3);
    assert_eq!(response.versions[0].created_by.name, "A");
    assert_eq!(response.versions[0].dataset.id, "DS1");
}

/// Test that a malformed version is reported as a decode error
#[tokio::test]
async fn test_list_dataset_versions_missing_field() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    let mut bad_version = version();
    bad_version.as_object_mut().unwrap().remove("totalRowCount");

    Mock::given(method("GET"))
        .and(path("/services/data/v54.0/wave/datasets/DS1/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "/x",
            "versions": [bad_version],
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let err = client.datasets().list_dataset_versions("DS1").await.unwrap_err();

    assert!(err.is_decode(), "expected decode error, got {err:?}");
    assert!(err.to_string().contains("totalRowCount"));
}

/// Test that an unknown dataset surfaces the status and body
#[tokio::test]
async fn test_list_dataset_versions_not_found() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v54.0/wave/datasets/missing/versions"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"[{"errorCode":"NOT_FOUND"}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    match client.datasets().list_dataset_versions("missing").await {
        Err(CrmaError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("NOT_FOUND"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

/// Test getting a single version with its XMD
#[tokio::test]
async fn test_get_dataset_version() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    let mut body = version();
    body["xmdMain"] = json!({
        "createdBy": user(),
        "createdDate": "2020-01-01T00:00:00Z",
        "dates": [],
        "derivedDimensions": [],
        "derivedMeasures": [],
        "dimensions": [{"field": "Category", "label": "Category"}],
        "lastModifiedBy": user(),
        "lastModifiedDate": "2020-01-02T00:00:00Z",
        "measures": [{"field": "Sales", "label": "Sales"}],
        "type": "main",
        "url": "/xmd",
    });

    Mock::given(method("GET"))
        .and(path("/services/data/v54.0/wave/datasets/DS1/versions/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let response = client.datasets().get_dataset_version("DS1", "v1")
        .await
        .expect("Failed to get dataset version");

    assert_eq!(response.version.id, "v1");
    assert_eq!(response.xmd_main.dimensions[0].field, "Category");
    assert_eq!(response.xmd_main.xmd_type, "main");
}

/// Test that identifiers are percent-encoded into the path
#[tokio::test]
async fn test_dataset_identifier_is_encoded() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v54.0/wave/datasets/Sales%20Data/versions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "/x", "versions": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let response = client.datasets().list_dataset_versions("Sales Data")
        .await
        .expect("Failed to list dataset versions");

    assert!(response.versions.is_empty());
}
