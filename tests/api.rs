use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog_admin_api::{
    app::build_router, config::AppConfig, repository::Repositories, state::AppState,
};

fn app() -> Router {
    let state = AppState::new(Repositories::in_memory(), &AppConfig::default());
    build_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
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
async fn health_carries_request_id() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let (status, body) = send(&app(), Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn attribute_lifecycle_over_http() {
    let app = app();
    let payload = json!({
        "code": "color",
        "name": "Color",
        "inputType": "select",
        "dataType": "string"
    });

    let (status, body) = send(&app, Method::POST, "/api/attributes", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::POST, "/api/attributes", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/api/attributes/code/color", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64(), Some(id));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/attributes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/attributes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_code_is_a_field_error() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/attributes",
        Some(json!({
            "code": "  ",
            "name": "Color",
            "inputType": "select",
            "dataType": "string"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["code"].is_object());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/api/attribute-sets",
        Some(json!({ "description": "no name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_status_route_enforces_transitions() {
    let app = app();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/stores",
        Some(json!({ "userId": 7, "name": "Corner Shop" })),
    )
    .await;
    assert_eq!(body["data"]["slug"], "corner-shop");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/stores/{id}/status"),
        Some(json!({ "status": "suspended" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/stores/{id}/status"),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (_, body) = send(&app, Method::GET, "/api/stores/stats", None).await;
    assert_eq!(body["data"]["approved"], 1);
}

#[tokio::test]
async fn product_listing_validates_and_paginates() {
    let app = app();
    for sku in ["SKU-A", "SKU-B", "SKU-C"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({
                "sku": sku,
                "name": format!("Widget {sku}"),
                "price": 9.5,
                "currency": "eur"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, "/api/products?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["totalPages"], 2);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, Method::GET, "/api/products?minPrice=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/products?page=9223372036854775807",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["page"].as_i64(), Some(i64::MAX));
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));

    let (status, _) = send(&app, Method::GET, "/api/stores?page=9223372036854775807", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_docs_are_served() {
    let response = app()
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn category_routes_reject_cycles_and_unknown_product_links() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/categories", Some(json!({ "name": "Clothing" }))).await;
    assert_eq!(status, StatusCode::OK);
    let clothing = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Shoes", "parentId": clothing })),
    )
    .await;
    let shoes = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{clothing}"),
        Some(json!({ "parentId": shoes })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["fields"]["parentId"]["code"], "INVALID_PARENT");

    let (status, body) = send(&app, Method::POST, "/api/categories", Some(json!({ "name": "CLOTHING" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["fields"]["name"]["code"], "NAME_EXISTS");

    let (status, body) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hierarchy"][1]["label"], "-- Shoes");
    assert_eq!(body["data"]["categories"][1]["parentName"], "Clothing");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "sku": "SKU-CAT",
            "name": "Sneaker",
            "price": 49.0,
            "currency": "usd",
            "categories": [shoes, 777]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["fields"]["categories"]["code"], "CATEGORIES_INVALID");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/categories/{shoes}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/categories/{shoes}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
