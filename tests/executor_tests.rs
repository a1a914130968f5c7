//! Integration tests for the request executor against a mock HTTP server.
//!
//! These tests verify header injection, status classification, retry
//! selectivity and timeout handling over a real `reqwest` transport.

use jsonapi_client::clients::{RequestExecutor, JSONAPI_MEDIA_TYPE};
use jsonapi_client::jsonapi::{ListParams, PaginationMeta};
use jsonapi_client::{ApiErrorKind, ApiKey, BaseUrl, ClientConfig, RateLimitConfig};
use serde_json::{json, Map, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, timeout: Duration) -> ClientConfig {
    ClientConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .base_url(BaseUrl::new(format!("{}/api/v2", server.uri())).unwrap())
        .timeout(timeout)
        .rate_limit(
            RateLimitConfig::builder()
                .retry_after(Duration::from_millis(10))
                .max_retries(2)
                .build()
                .unwrap(),
        )
        .user_agent_prefix("IntegrationTests/1.0")
        .build()
        .unwrap()
}

fn executor_for(server: &MockServer) -> RequestExecutor {
    RequestExecutor::new(config_for(server, Duration::from_secs(5))).unwrap()
}

fn error_body(detail: &str) -> Value {
    json!({"errors": [{"status": "404", "title": "Not Found", "detail": detail}]})
}

// ============================================================================
// Successful Requests
// ============================================================================

#[tokio::test]
async fn test_get_sends_headers_and_decodes_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/people/7"))
        .and(header("Accept", JSONAPI_MEDIA_TYPE))
        .and(header("Authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "7",
                "type": "people",
                "attributes": {"first-name": "Ada", "job-title": "Engineer"},
                "relationships": {"company": {"data": {"id": "3", "type": "companies"}}}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let document = executor.get("people/7", &ListParams::new()).await.unwrap();

    assert_eq!(document.data.id, "7");
    assert_eq!(document.data.get("firstName"), Some(&json!("Ada")));
    assert_eq!(document.data.get("jobTitle"), Some(&json!("Engineer")));
    assert_eq!(document.data.relationship("company")[0].id, "3");

    let requests = server.received_requests().await.unwrap();
    let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(user_agent.starts_with("IntegrationTests/1.0 | JSON:API Client Library v"));
}

#[tokio::test]
async fn test_list_forwards_filter_and_page_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/deals"))
        .and(query_param("filter[value][gte]", "1000"))
        .and(query_param("filter[stage]", "won,lost"))
        .and(query_param("page[number]", "2"))
        .and(query_param("page[size]", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "type": "deals", "attributes": {"value": 1500}}],
            "meta": {"current-page": 2, "next-page": null, "prev-page": 1, "total-pages": 2, "total-count": 26}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ListParams::new()
        .filter_op("value", "gte", 1000)
        .filter("stage", json!(["won", "lost"]))
        .page(jsonapi_client::pagination::PageRequest::new(2, 25));
    let page = executor_for(&server).list("deals", &params).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.meta.current_page, 2);
    assert_eq!(page.meta.next_page, None);
    assert_eq!(page.meta.total_count, 26);
}

#[tokio::test]
async fn test_list_without_meta_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let page = executor_for(&server)
        .list("tags", &ListParams::new())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.meta, PaginationMeta::default());
}

#[tokio::test]
async fn test_create_encodes_wire_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/people"))
        .and(header("Content-Type", JSONAPI_MEDIA_TYPE))
        .and(body_json(json!({
            "data": {"type": "people", "attributes": {"first-name": "Grace", "last-name": "Hopper"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "99", "type": "people", "attributes": {"first-name": "Grace", "last-name": "Hopper"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = Map::new();
    data.insert("firstName".to_string(), json!("Grace"));
    data.insert("lastName".to_string(), json!("Hopper"));

    let created = executor_for(&server)
        .create("people", "people", &data)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.data.id, "99");
    assert_eq!(created.data.get("lastName"), Some(&json!("Hopper")));
}

#[tokio::test]
async fn test_no_content_skips_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/people/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/people/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let mut data = Map::new();
    data.insert("nickname".to_string(), json!("Amazing Grace"));

    let updated = executor.update("people/5", "people", "5", &data).await.unwrap();
    assert!(updated.is_none());
    executor.delete("people/5").await.unwrap();
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_not_found_uses_first_error_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body("x")))
        .expect(1)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .get("people/404", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, ApiErrorKind::NotFound);
    assert_eq!(error.message, "x");
    assert_eq!(error.status_code, Some(404));
    assert!(error.request_url.unwrap().ends_with("/api/v2/people/404"));
}

#[tokio::test]
async fn test_authentication_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"title": "Unauthorized"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .list("people", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, ApiErrorKind::Authentication);
    assert_eq!(error.message, "Unauthorized");
}

#[tokio::test]
async fn test_validation_error_carries_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [
                {"detail": "can't be blank", "source": {"pointer": "/data/attributes/first-name"}},
                {"detail": "is invalid", "source": {"pointer": "/data/attributes/email"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .create("people", "people", &Map::new())
        .await
        .unwrap_err();

    assert!(matches!(error.kind, ApiErrorKind::Validation { ref errors } if errors.len() == 2));
    assert_eq!(
        error.format_validation_errors(),
        "firstName: can't be blank\nemail: is invalid"
    );
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .list("people", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, ApiErrorKind::Server { status: 503 });
    assert_eq!(error.message, "Request failed with status 503");
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({"errors": [{"detail": "Too many requests"}]})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let page = executor.list("people", &ListParams::new()).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(executor.rate_limit_status().current_count, 2);
}

#[tokio::test]
async fn test_rate_limit_error_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .list("people", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(
        error.kind,
        ApiErrorKind::RateLimit {
            retry_after: Some(Duration::ZERO)
        }
    );
    assert_eq!(error.retry_after(), Some(Duration::ZERO));
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let executor =
        RequestExecutor::new(config_for(&server, Duration::from_millis(50))).unwrap();
    let error = executor
        .list("people", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(
        error.kind,
        ApiErrorKind::Timeout {
            timeout: Duration::from_millis(50)
        }
    );
}

#[tokio::test]
async fn test_invalid_json_is_generic_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let error = executor_for(&server)
        .list("people", &ListParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, ApiErrorKind::Generic { status: 200 });
}
