use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use petstore_api::{
    db, repositories::memory::InMemoryBucketRepository, routes::routes::app, state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    let state = AppState::new(
        pool,
        Arc::new(InMemoryBucketRepository::new()),
        Arc::new(InMemoryBucketRepository::new()),
    );
    app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
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

async fn create_seller(app: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/sellers",
        Some(json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_pet(app: &Router, name: &str, seller_id: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/pets",
        Some(json!({ "name": name, "species": "dog", "age": 2, "price": 150.0, "seller_id": seller_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn healthz_is_always_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_seller_returns_envelope() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/sellers",
        Some(json!({ "name": "Ana", "email": "ana@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Seller created successfully");
    assert_eq!(body["data"]["name"], "Ana");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn seller_requires_name_and_email() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::POST, "/sellers", Some(json!({ "name": "Ana" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "name and email are required");
}

#[tokio::test]
async fn duplicate_seller_email_conflicts() {
    let app = test_app().await;
    create_seller(&app, "Ana", "ana@x.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/sellers",
        Some(json!({ "name": "Other", "email": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "seller email already exists");
}

#[tokio::test]
async fn padded_email_collides_with_plain_email() {
    let app = test_app().await;
    create_seller(&app, "Ana", "ana@x.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/sellers",
        Some(json!({ "name": "Ana", "email": " ana@x.com " })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "seller email already exists");
}

#[tokio::test]
async fn pet_for_missing_seller_is_not_found() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/pets",
        Some(json!({ "name": "Rex", "species": "dog", "seller_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "seller not found");
}

#[tokio::test]
async fn seller_with_pets_cannot_be_deleted() {
    let app = test_app().await;
    let seller = create_seller(&app, "Ana", "ana@x.com").await;
    create_pet(&app, "Rex", seller).await;
    create_pet(&app, "Fido", seller).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/sellers/{seller}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "cannot delete seller with existing pets");

    let (status, _) = send(&app, Method::GET, &format!("/sellers/{seller}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleted_seller_is_gone() {
    let app = test_app().await;
    let seller = create_seller(&app, "Ana", "ana@x.com").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/sellers/{seller}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Seller deleted successfully");

    let (status, body) = send(&app, Method::GET, &format!("/sellers/{seller}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "seller not found");
}

#[tokio::test]
async fn seller_can_embed_pets() {
    let app = test_app().await;
    let seller = create_seller(&app, "Ana", "ana@x.com").await;
    create_pet(&app, "Rex", seller).await;

    let (_, plain) = send(&app, Method::GET, &format!("/sellers/{seller}"), None).await;
    assert!(plain["data"].get("pets").is_none());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/sellers/{seller}?include_pets=true"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pets"][0]["name"], "Rex");
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/pets/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid pet ID");

    let (status, body) = send(&app, Method::DELETE, "/sellers/x1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid seller ID");

    let (status, body) = send(&app, Method::GET, "/pets?seller_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid seller ID");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/sellers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid JSON payload");
}

#[tokio::test]
async fn pets_filter_by_seller() {
    let app = test_app().await;
    let ana = create_seller(&app, "Ana", "ana@x.com").await;
    let bo = create_seller(&app, "Bo", "bo@x.com").await;
    create_pet(&app, "Rex", ana).await;
    create_pet(&app, "Tom", bo).await;
    create_pet(&app, "Fido", ana).await;

    let (status, body) = send(&app, Method::GET, &format!("/pets?seller_id={ana}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let pets = body["data"].as_array().unwrap();
    assert_eq!(pets.len(), 2);
    assert!(pets.iter().all(|p| p["seller_id"] == ana));

    let (_, body) = send(&app, Method::GET, "/pets?include_seller=true", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][1]["seller"]["name"], "Bo");
}

#[tokio::test]
async fn pet_update_is_partial() {
    let app = test_app().await;
    let seller = create_seller(&app, "Ana", "ana@x.com").await;
    let pet = create_pet(&app, "Rex", seller).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/pets/{pet}"),
        Some(json!({ "price": 99.5, "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pet updated successfully");
    assert_eq!(body["data"]["name"], "Rex");
    assert_eq!(body["data"]["age"], 2);
    assert_eq!(body["data"]["price"], 99.5);
    assert_eq!(body["data"]["available"], false);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/pets/{pet}"),
        Some(json!({ "seller_id": 404 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "seller not found");
}

#[tokio::test]
async fn favorites_round_trip() {
    let app = test_app().await;
    let seller = create_seller(&app, "Ana", "ana@x.com").await;
    let rex = create_pet(&app, "Rex", seller).await;
    let tom = create_pet(&app, "Tom", seller).await;

    for pet in [rex, tom, rex] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/7/favorites",
            Some(json!({ "pet_id": pet })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Pet added to favorites");
    }

    let (status, body) = send(&app, Method::GET, "/users/7/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Rex", "Tom", "Rex"]);

    let (status, _) = send(&app, Method::DELETE, &format!("/users/7/favorites/{rex}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/users/7/favorites", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Cart is a separate bucket.
    let (_, body) = send(&app, Method::GET, "/users/7/cart", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn user_crud() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "Kim", "email": "kim@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        Some(json!({ "phone": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Kim");
    assert_eq!(body["data"]["phone"], "555-0100");

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let app = test_app().await;
    let (status, _) = send(&app, Method::PATCH, "/sellers", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn responses_carry_cors_headers() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/healthz")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/does-not-exist")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS)
    );
}
