use crma_api_client::{
    ClientConfig, ConnectionInfo, CrmaClient, CrmaError, CrmaResult, Encodable, RetryPolicy,
};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PING_PATH: &str = "/services/data/v54.0/wave/ping";

/// Helper to create a client with a short backoff
fn create_test_client(uri: &str, timeout: Duration) -> CrmaResult<CrmaClient> {
    let config = ClientConfig {
        timeout,
        retry: RetryPolicy::new(3, Duration::from_millis(10))?,
        ..ClientConfig::default()
    };
    CrmaClient::with_config(ConnectionInfo::new(uri, "test-token"), config)
}

async fn mount_status(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(PING_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(format!("status {status}")))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

/// Test that 502 responses are retried until success
#[tokio::test]
async fn test_retry_502_then_success() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    mount_status(&server, 502, 2).await;
    Mock::given(method("GET"))
        .and(path(PING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create client");
    let response = client.request(Method::GET, "wave/ping", None, None)
        .await
        .expect("Request should succeed on the third attempt");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<serde_json::Value>().unwrap(), json!({"ok": true}));
}

/// Test that retries stop after three attempts
#[tokio::test]
async fn test_retry_502_exhausted() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PING_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(3)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create client");
    match client.request(Method::GET, "/wave/ping", None, None).await {
        Err(CrmaError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

/// Test that other server errors are not retried
#[tokio::test]
async fn test_no_retry_on_500() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    mount_status(&server, 500, 1).await;

    let client = create_test_client(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create client");
    let err = client.request(Method::GET, "/wave/ping/", None, None).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

/// Test that a timed-out attempt is a transport error and not retried
#[tokio::test]
async fn test_timeout_is_transport_error() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PING_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri(), Duration::from_millis(200))
        .expect("Failed to create client");
    let err = client.request(Method::GET, "/wave/ping", None, None).await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

/// Test that connection failures surface as transport errors
#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let _ = env_logger::try_init();

    let client = create_test_client("http://127.0.0.1:1", Duration::from_secs(2))
        .expect("Failed to create client");
    let err = client.request(Method::GET, "/wave/ping", None, None).await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

/// Test that bodies are normalized and query params are forwarded
#[tokio::test]
async fn test_request_body_and_params() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/data/v54.0/wave/echo"))
        .and(query_param("pageSize", "10"))
        .and(body_json(json!({"tags": {"a": true}, "raw": "bytes", "count": 2})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri(), Duration::from_secs(5))
        .expect("Failed to create client");
    let body = Encodable::Map(vec![
        ("tags".into(), Encodable::Set(vec!["a".into()])),
        ("raw".into(), b"bytes".to_vec().into()),
        ("count".into(), 2i64.into()),
    ]);

    let response = client
        .request(Method::POST, "/wave/echo/", Some(&body), Some(&[("pageSize", "10")][..]))
        .await
        .expect("Request should succeed");

    assert_eq!(response.status().as_u16(), 201);
    assert!(response.bytes().is_empty());
}
