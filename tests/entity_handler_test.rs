mod support;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

use store_backend::handler::EntityState;
use store_backend::model::{Clothes, Electronics, Grocery, StoreEntity};
use store_backend::repository::EntityRepository;
use store_backend::router::entity_router;
use support::MemoryRepository;

fn app_with<E: StoreEntity>(repo: MemoryRepository, expose_errors: bool) -> Router {
    let repo = Arc::new(repo) as Arc<dyn EntityRepository<E>>;
    Router::new().merge(entity_router(EntityState::new(repo, expose_errors)))
}

fn app<E: StoreEntity>() -> Router {
    app_with::<E>(MemoryRepository::new(), false)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_list_returns_empty_array_not_404() {
    let app = app::<Grocery>();
    let (status, body) = send(&app, "GET", "/groceries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_with_malformed_id_is_400() {
    let app = app::<Grocery>();
    let (status, body) = send(&app, "GET", "/groceries/invalid-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid grocery ID format");
}

#[tokio::test]
async fn test_get_with_unknown_valid_id_is_404() {
    let app = app::<Electronics>();
    let (status, body) = send(&app, "GET", "/electronics/507f1f77bcf86cd799439099", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Electronics item not found");
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = app::<Clothes>();

    let payload = json!({ "name": "T-Shirt", "size": "M", "price": 15.99 });
    let (status, body) = send(&app, "POST", "/clothes", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Clothes created successfully");
    let id = body["id"].as_str().expect("generated id missing");
    assert_eq!(id.len(), 24);

    let (status, fetched) = send(&app, "GET", &format!("/clothes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["_id"], id);
    assert_eq!(fetched["name"], "T-Shirt");
    assert_eq!(fetched["size"], "M");
    assert_eq!(fetched["price"], 15.99);
    assert!(fetched["createdAt"].is_string());
    assert!(fetched["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_trims_string_fields() {
    let app = app::<Clothes>();
    let payload = json!({ "name": "  Jacket  ", "size": " L ", "price": 49.0 });
    let (status, body) = send(&app, "POST", "/clothes", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["id"].as_str().unwrap();
    let (_, fetched) = send(&app, "GET", &format!("/clothes/{}", id), None).await;
    assert_eq!(fetched["name"], "Jacket");
    assert_eq!(fetched["size"], "L");
}

#[tokio::test]
async fn test_create_with_empty_name_reports_violation() {
    let app = app::<Clothes>();
    let payload = json!({ "name": "", "size": "M", "price": 15.99 });
    let (status, body) = send(&app, "POST", "/clothes", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().expect("details missing");
    assert!(details.contains(&json!("Name is required and must be a non-empty string")));
}

#[tokio::test]
async fn test_create_reports_all_violations_at_once() {
    let app = app::<Electronics>();
    let (status, body) = send(&app, "POST", "/electronics", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().expect("details missing");
    assert_eq!(details.len(), 3);
}

#[tokio::test]
async fn test_create_with_non_object_body_is_400() {
    let app = app::<Grocery>();
    let (status, body) = send(&app, "POST", "/groceries", Some(json!(42))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body is required and must be an object");

    let (status, body) = send(&app, "POST", "/groceries", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body is required and must be an object");
}

#[tokio::test]
async fn test_grocery_allows_zero_quantity_and_price() {
    let app = app::<Grocery>();
    let payload = json!({ "name": "Free Sample", "quantity": 0, "price": 0 });
    let (status, _) = send(&app, "POST", "/groceries", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_clothes_rejects_zero_price() {
    let app = app::<Clothes>();
    let payload = json!({ "name": "Socks", "size": "S", "price": 0 });
    let (status, body) = send(&app, "POST", "/clothes", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&json!("Price is required and must be a positive number")));
}

#[tokio::test]
async fn test_update_with_identical_payload_reports_unchanged() {
    let app = app::<Grocery>();
    let payload = json!({ "name": "Milk", "quantity": 2, "price": 3.5 });
    let (_, created) = send(&app, "POST", "/groceries", Some(payload.clone())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "PUT", &format!("/groceries/{}", id), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Grocery data unchanged");
}

#[tokio::test]
async fn test_update_with_changed_payload_writes_and_keeps_creation_stamp() {
    let app = app::<Grocery>();
    let (_, created) = send(
        &app,
        "POST",
        "/groceries",
        Some(json!({ "name": "Milk", "quantity": 2, "price": 3.5 })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let (_, before) = send(&app, "GET", &format!("/groceries/{}", id), None).await;
    let created_at = before["createdAt"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/groceries/{}", id),
        Some(json!({ "name": "Milk", "quantity": 2, "price": 4.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Grocery updated successfully");

    let (_, after) = send(&app, "GET", &format!("/groceries/{}", id), None).await;
    assert_eq!(after["price"], 4.0);
    assert_eq!(after["createdAt"], created_at.as_str());
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let app = app::<Grocery>();
    let (status, body) = send(
        &app,
        "PUT",
        "/groceries/507f1f77bcf86cd799439099",
        Some(json!({ "name": "Milk", "quantity": 2, "price": 3.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Grocery item not found");
}

#[tokio::test]
async fn test_update_checks_identifier_before_body() {
    // Both the id and the body are bad; the id check wins.
    let app = app::<Grocery>();
    let (status, body) = send(&app, "PUT", "/groceries/invalid-id", Some(json!(42))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid grocery ID format");
}

#[tokio::test]
async fn test_delete_then_get_then_delete_again() {
    let app = app::<Clothes>();
    let (_, created) = send(
        &app,
        "POST",
        "/clothes",
        Some(json!({ "name": "T-Shirt", "size": "M", "price": 15.99 })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/clothes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Clothes deleted successfully");

    let (status, _) = send(&app, "GET", &format!("/clothes/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Idempotent in outcome, not in status
    let (status, body) = send(&app, "DELETE", &format!("/clothes/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Clothes item not found");
}

#[tokio::test]
async fn test_unreachable_storage_is_500_with_hidden_details() {
    let app = app_with::<Grocery>(MemoryRepository::unreachable(), false);
    let (status, body) = send(&app, "GET", "/groceries", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database connection not available");
    assert_eq!(body["details"], "Internal server error");
}

#[tokio::test]
async fn test_unreachable_storage_exposes_details_in_development() {
    let app = app_with::<Grocery>(MemoryRepository::unreachable(), true);
    let (status, body) = send(&app, "GET", "/groceries", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("storage offline"));
}

#[tokio::test]
async fn test_validation_runs_before_storage_availability() {
    // A bad payload on a dead store still gets the 400, never the 500.
    let app = app_with::<Clothes>(MemoryRepository::unreachable(), false);
    let (status, body) = send(
        &app,
        "POST",
        "/clothes",
        Some(json!({ "name": "", "size": "", "price": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
}
