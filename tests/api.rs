use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pet_store_api::{app, AppState, DeletePolicy, MemoryRepository, PetStoreService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(policy: DeletePolicy) -> Router {
    let service = PetStoreService::new(Arc::new(MemoryRepository::new()), policy);
    app(AppState::new(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_and_ready() {
    let app = router(DeletePolicy::Cascade);
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn info_reports_storage_and_delete_policy() {
    let app = router(DeletePolicy::Restrict);
    let (status, body) = send(&app, Method::GET, "/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "pet-store-api");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["deletePolicy"], "restrict");

    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("storage").is_none());
}

#[tokio::test]
async fn store_lifecycle() {
    let app = router(DeletePolicy::Cascade);

    let (status, body) = send(
        &app,
        Method::POST,
        "/pet_store",
        Some(json!({"petStoreName": "Paws", "petStoreCity": "Boise"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["petStoreId"], 1);
    assert_eq!(body["data"]["employees"], json!([]));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/pet_store/1",
        Some(json!({"petStoreName": "Paws Downtown"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["petStoreName"], "Paws Downtown");
    assert_eq!(body["data"]["petStoreCity"], Value::Null);

    let (status, body) = send(&app, Method::DELETE, "/pet_store/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["message"],
        "Deletion of pet store with ID=1 was successful."
    );

    let (status, body) = send(&app, Method::GET, "/pet_store/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "Pet store with ID=1 does not exist.");
}

#[tokio::test]
async fn list_omits_collections_that_get_includes() {
    let app = router(DeletePolicy::Cascade);
    send(&app, Method::POST, "/pet_store", Some(json!({"petStoreName": "Paws"}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/pet_store/1/employee",
        Some(json!({"employeeFirstName": "Ann", "employeeJobTitle": "Groomer"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["employeeId"], 1);
    assert_eq!(body["data"]["petStoreId"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/pet_store/1/customer",
        Some(json!({"customerFirstName": "Alice", "customerEmail": "alice@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["petStoreIds"], json!([1]));

    let (status, body) = send(&app, Method::GET, "/pet_store", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["employees"], json!([]));
    assert_eq!(body["data"][0]["customers"], json!([]));

    let (status, body) = send(&app, Method::GET, "/pet_store/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employees"][0]["employeeFirstName"], "Ann");
    assert_eq!(body["data"]["customers"][0]["customerFirstName"], "Alice");

    let (status, body) = send(&app, Method::GET, "/pet_store/1/employee/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employeeJobTitle"], "Groomer");

    let (status, body) = send(&app, Method::GET, "/pet_store/1/customer/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customerEmail"], "alice@example.com");
}

#[tokio::test]
async fn wrong_parent_is_an_invalid_request() {
    let app = router(DeletePolicy::Cascade);
    send(&app, Method::POST, "/pet_store", Some(json!({"petStoreName": "A"}))).await;
    send(&app, Method::POST, "/pet_store", Some(json!({"petStoreName": "B"}))).await;
    send(
        &app,
        Method::POST,
        "/pet_store/2/employee",
        Some(json!({"employeeFirstName": "Ann"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/pet_store/1/employee/1",
        Some(json!({"employeeFirstName": "Mallory"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");
    assert_eq!(
        body["error"]["message"],
        "Employee with ID=1 does not exist in pet store with ID=1."
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/pet_store/999/customer",
        Some(json!({"customerFirstName": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = router(DeletePolicy::Cascade);

    let (status, body) = send(&app, Method::GET, "/pet_store/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, _) = send(&app, Method::POST, "/pet_store", Some(json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/pet_store",
        Some(json!({"petStoreName": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn restrict_policy_reports_conflict() {
    let app = router(DeletePolicy::Restrict);
    send(&app, Method::POST, "/pet_store", Some(json!({"petStoreName": "Busy"}))).await;
    send(
        &app,
        Method::POST,
        "/pet_store/1/customer",
        Some(json!({"customerFirstName": "Alice"})),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/pet_store/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = send(&app, Method::GET, "/pet_store/1", None).await;
    assert_eq!(status, StatusCode::OK);
}
