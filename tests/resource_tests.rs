//! Integration tests for the resource façade and lazy pagination.

use jsonapi_client::jsonapi::ListParams;
use jsonapi_client::pagination::PaginationOptions;
use jsonapi_client::{
    ApiClient, ApiKey, BaseUrl, Capabilities, ClientConfig, RateLimitConfig, ResourceDescriptor,
    ResourceError, ResourceOperation,
};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTES: ResourceDescriptor =
    ResourceDescriptor::new("Note", "notes", "notes", Capabilities::ALL);
const ACTIVITIES: ResourceDescriptor =
    ResourceDescriptor::new("Activity", "activities", "activities", Capabilities::READ_ONLY);

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .rate_limit(RateLimitConfig::disabled())
        .build()
        .unwrap();
    ApiClient::new(config).unwrap()
}

fn notes_page(first_id: u32, count: u32, next_page: Option<u32>) -> Value {
    let data: Vec<Value> = (first_id..first_id + count)
        .map(|id| {
            json!({
                "id": id.to_string(),
                "type": "notes",
                "attributes": {"body": format!("note {id}"), "created-at": "2024-03-01"}
            })
        })
        .collect();
    json!({
        "data": data,
        "meta": {"current-page": 1, "next-page": next_page, "total-pages": 2, "total-count": 5}
    })
}

async fn mount_page(server: &MockServer, number: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("page[number]", number))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unsupported_operation_makes_no_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let result = client.resource(&ACTIVITIES).delete("1").await;

    match result {
        Err(ResourceError::Unsupported {
            resource,
            operation,
        }) => {
            assert_eq!(resource, "Activity");
            assert_eq!(operation, ResourceOperation::Delete);
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_iter_walks_every_page_lazily() {
    let server = MockServer::start().await;
    mount_page(&server, "1", notes_page(1, 3, Some(2)), 1).await;
    mount_page(&server, "2", notes_page(4, 2, None), 1).await;

    let client = client_for(&server);
    let notes = client.resource(&NOTES);
    let mut items = notes
        .iter(ListParams::new().sort("-created-at"), PaginationOptions::new().page_size(3))
        .unwrap();

    let first = items.next().await.unwrap().unwrap();
    assert_eq!(first.id, "1");
    assert_eq!(first.get("createdAt"), Some(&json!("2024-03-01")));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let mut ids = vec![first.id];
    while let Some(note) = items.next().await {
        ids.push(note.unwrap().id);
    }

    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert!(items.is_finished());
}

#[tokio::test]
async fn test_take_requests_only_needed_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "1", notes_page(1, 3, Some(2)), 1).await;
    mount_page(&server, "2", notes_page(4, 2, None), 0).await;

    let client = client_for(&server);
    let notes = client
        .resource(&NOTES)
        .take(ListParams::new(), 3, PaginationOptions::new().page_size(3))
        .await
        .unwrap();

    assert_eq!(notes.len(), 3);
}

#[tokio::test]
async fn test_iteration_stops_at_first_error() {
    let server = MockServer::start().await;
    mount_page(&server, "1", notes_page(1, 2, Some(2)), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"detail": "Page not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .resource(&NOTES)
        .collect_all(ListParams::new(), PaginationOptions::new().page_size(2))
        .await
        .unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "Page not found");
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Note {
    id: String,
    body: String,
    created_at: String,
}

#[tokio::test]
async fn test_find_as_returns_typed_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/12"))
        .and(query_param("include", "author"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 12,
                "type": "notes",
                "attributes": {"body": "Follow up", "created-at": "2024-03-02"}
            },
            "included": [{"id": "4", "type": "people", "attributes": {"first-name": "Ada"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let note: Note = client
        .resource(&NOTES)
        .find_as("12", &ListParams::new().include("author"))
        .await
        .unwrap();

    assert_eq!(note.id, "12");
    assert_eq!(note.body, "Follow up");
    assert_eq!(note.created_at, "2024-03-02");
}
