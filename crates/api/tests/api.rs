//! Integration tests for the HTTP surface.
//!
//! Drives the full router against an in-memory `SQLite` database; no live
//! network is involved. Relay clients are left unconfigured except where a
//! test exercises their absence or failure behavior.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use mayorista_api::config::{ApiConfig, EmailConfig};
use mayorista_api::services::EmailService;
use mayorista_api::state::AppState;
use mayorista_api::{db, routes};

async fn memory_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        allowed_origins: vec!["*".to_string()],
        media: None,
        email: None,
        sentry_dsn: None,
    }
}

async fn test_app() -> Router {
    let pool = memory_pool().await;
    let state = AppState::with_services(test_config(), pool, None, None);
    routes::routes().with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

fn gorro_rojo() -> Value {
    json!({
        "name": "Gorro Rojo",
        "price": 2500,
        "description": "Gorro de lana rojo",
        "image_url": "http://x/y.jpg",
        "category": "Gorros"
    })
}

#[tokio::test]
async fn create_product_assigns_id_and_defaults() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/productos", &gorro_rojo()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["active"], json!(true));
    assert_eq!(body["wholesale_minimum_qty"], json!(1));
    assert_eq!(body["name"], json!("Gorro Rojo"));
    assert_eq!(body["price"], json!(2500.0));
}

#[tokio::test]
async fn created_product_roundtrips_through_get() {
    let app = test_app().await;

    let (_, created) = post_json(&app, "/productos", &gorro_rojo()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = get(&app, &format!("/productos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn listing_respects_active_filter() {
    let app = test_app().await;

    post_json(&app, "/productos", &gorro_rojo()).await;
    let mut hidden = gorro_rojo();
    hidden["name"] = json!("Gorro Oculto");
    hidden["active"] = json!(false);
    post_json(&app, "/productos", &hidden).await;

    let (status, body) = get(&app, "/productos").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Gorro Rojo"]);

    let (_, inactive) = get(&app, "/productos?activo=false").await;
    let names: Vec<_> = inactive
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Gorro Oculto"]);
}

#[tokio::test]
async fn listing_filters_by_category_newest_first() {
    let app = test_app().await;

    post_json(&app, "/productos", &gorro_rojo()).await;
    let mut scarf = gorro_rojo();
    scarf["name"] = json!("Bufanda Azul");
    scarf["category"] = json!("Bufandas");
    post_json(&app, "/productos", &scarf).await;
    let mut second_hat = gorro_rojo();
    second_hat["name"] = json!("Gorro Verde");
    post_json(&app, "/productos", &second_hat).await;

    let (_, body) = get(&app, "/productos?categoria=Gorros").await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    // Descending by id: newest first.
    assert_eq!(names, vec!["Gorro Verde", "Gorro Rojo"]);
}

#[tokio::test]
async fn missing_product_is_404() {
    let app = test_app().await;

    let (status, body) = get(&app, "/productos/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_product_body_is_client_error() {
    let app = test_app().await;

    // Missing most required fields.
    let (status, _) = post_json(&app, "/productos", &json!({"name": "Gorro"})).await;
    assert!(status.is_client_error());

    // Shape is fine but the values violate the contract.
    let mut negative = gorro_rojo();
    negative["price"] = json!(-5);
    let (status, body) = post_json(&app, "/productos", &negative).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn delete_product_then_get_is_404() {
    let app = test_app().await;

    let (_, created) = post_json(&app, "/productos", &gorro_rojo()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = delete(&app, &format!("/productos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = get(&app, &format!("/productos/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, &format!("/productos/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_image_overwrites_url() {
    let app = test_app().await;

    let (_, created) = post_json(&app, "/productos", &gorro_rojo()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = post_json(
        &app,
        &format!("/actualizar-imagen-producto?producto_id={id}&imagen_url=http://cdn/nuevo.jpg"),
        &Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], json!("http://cdn/nuevo.jpg"));

    let (_, fetched) = get(&app, &format!("/productos/{id}")).await;
    assert_eq!(fetched["image_url"], json!("http://cdn/nuevo.jpg"));
}

#[tokio::test]
async fn update_image_unknown_product_is_404() {
    let app = test_app().await;

    let (status, _) = post_json(
        &app,
        "/actualizar-imagen-producto?producto_id=999&imagen_url=http://cdn/x.jpg",
        &Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_are_distinct_sorted_and_active_only() {
    let app = test_app().await;

    post_json(&app, "/productos", &gorro_rojo()).await;
    post_json(&app, "/productos", &gorro_rojo()).await;
    let mut scarf = gorro_rojo();
    scarf["category"] = json!("Bufandas");
    post_json(&app, "/productos", &scarf).await;
    let mut hidden = gorro_rojo();
    hidden["category"] = json!("Guantes");
    hidden["active"] = json!(false);
    post_json(&app, "/productos", &hidden).await;

    let (status, body) = get(&app, "/categorias").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"categorias": ["Bufandas", "Gorros"]}));
}

#[tokio::test]
async fn create_order_and_list_it_back() {
    let app = test_app().await;

    let order = json!({
        "customer_name": "Maria Lopez",
        "customer_phone": "+54 11 5555-0001",
        "product_id": 3,
        "product_name": "Gorro Polar",
        "quantity": 3
    });
    let (status, body) = post_json(&app, "/pedidos", &order).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));

    let (status, body) = get(&app, "/pedidos").await;
    assert_eq!(status, StatusCode::OK);
    let pedidos = body["pedidos"].as_array().unwrap();
    assert_eq!(pedidos.len(), 1);
    assert_eq!(pedidos[0]["id"].as_i64(), Some(id));
    assert_eq!(pedidos[0]["quantity"], json!(3));
    assert_eq!(pedidos[0]["status"], json!("pending"));
    assert_eq!(pedidos[0]["comments"], json!(""));
}

#[tokio::test]
async fn order_with_non_positive_quantity_is_rejected() {
    let app = test_app().await;

    let order = json!({
        "customer_name": "Maria",
        "customer_phone": "+54 11 5555-0001",
        "product_id": 1,
        "product_name": "Gorro",
        "quantity": 0
    });
    let (status, _) = post_json(&app, "/pedidos", &order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/pedidos").await;
    assert_eq!(body["pedidos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_product_leaves_order_snapshot_intact() {
    let app = test_app().await;

    let (_, product) = post_json(&app, "/productos", &gorro_rojo()).await;
    let product_id = product["id"].as_i64().unwrap();

    let order = json!({
        "customer_name": "Maria",
        "customer_phone": "+54 11 5555-0001",
        "product_id": product_id,
        "product_name": "Gorro Rojo",
        "quantity": 2
    });
    post_json(&app, "/pedidos", &order).await;

    delete(&app, &format!("/productos/{product_id}")).await;

    let (_, body) = get(&app, "/pedidos").await;
    let pedidos = body["pedidos"].as_array().unwrap();
    assert_eq!(pedidos.len(), 1);
    assert_eq!(pedidos[0]["product_name"], json!("Gorro Rojo"));
    assert_eq!(pedidos[0]["product_id"].as_i64(), Some(product_id));
}

#[tokio::test]
async fn order_creation_survives_failing_notification_relay() {
    // SMTP transport pointing at a closed port: the send fails after the
    // response is already decided, and must never surface to the caller.
    let email_config = EmailConfig {
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: 1,
        smtp_username: "mailer".to_string(),
        smtp_password: SecretString::from("not-a-real-password"),
        from_address: "tienda@example.com".to_string(),
        notify_address: "ventas@example.com".to_string(),
    };
    let email = EmailService::new(&email_config).unwrap();

    let pool = memory_pool().await;
    let state = AppState::with_services(test_config(), pool, None, Some(email));
    let app = routes::routes().with_state(state);

    let order = json!({
        "customer_name": "Maria",
        "customer_phone": "+54 11 5555-0001",
        "product_id": 1,
        "product_name": "Gorro",
        "quantity": 1
    });
    let (status, body) = post_json(&app, "/pedidos", &order).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_i64().is_some());
}

fn multipart_request(content_type: &str, filename: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n\
         fake-image-bytes\r\n\
         --{boundary}--\r\n"
    );
    Request::post("/upload-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_with_non_image_type_is_400_before_relay() {
    // No media relay configured: a 400 here proves validation runs first,
    // since hitting the relay branch would produce a 503 instead.
    let app = test_app().await;

    let (status, body) = send(&app, multipart_request("text/plain", "notes.txt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upload_without_relay_configured_is_503() {
    let app = test_app().await;

    let (status, body) = send(&app, multipart_request("image/png", "gorro.png")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_and_root_respond() {
    let app = test_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, _) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"].is_array());
}
