//! End-to-end storefront flows over HTTP.

#![allow(clippy::unwrap_used)]

use aurora_integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;

async fn get(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let resp = server.client.get(server.url(path)).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn post(server: &TestServer, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = server
        .client
        .post(server.url(path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

fn checkout_form() -> Value {
    json!({
        "shipping": {
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@aurora.test",
            "phone": "555-0100",
            "address": "1 Market St",
            "city": "Springfield",
            "state": "IL",
            "zip_code": "62701",
            "country": "US",
        },
        "payment": {
            "card_number": "4111111111111111",
            "expiry_date": "08/28",
            "cvv": "321",
            "card_name": "Jane Doe",
        },
    })
}

fn register_form() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@aurora.test",
        "password": "hunter22",
        "confirm_password": "hunter22",
    })
}

// ============================================================================
// Browsing
// ============================================================================

#[tokio::test]
async fn test_health_and_catalog() {
    let tmp = TempDir::new().unwrap();
    let server = TestServer::start(tmp.path()).await;

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let (status, products) = get(&server, "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 4);

    let (_, deals) = get(&server, "/api/deals").await;
    assert_eq!(deals.as_array().unwrap().len(), 4);
    assert_eq!(deals[0]["title"], "Canvas Backpack");
    assert_eq!(deals[0]["simulated"], true);

    let (_, deals) = get(&server, "/api/deals?sort=discount").await;
    assert_eq!(deals[0]["title"], "Wireless Headphones");
    assert_eq!(deals[0]["discount_percent"], 25);

    let (_, results) = get(&server, "/api/search?q=tee&category=men's%20clothing").await;
    assert_eq!(results["count"], 1);

    server.stop();
}

// ============================================================================
// Shopping and checkout
// ============================================================================

#[tokio::test]
async fn test_shop_and_checkout() {
    let tmp = TempDir::new().unwrap();
    let server = TestServer::start(tmp.path()).await;

    post(&server, "/api/cart/items", &json!({ "product_id": 3, "quantity": 1 })).await;
    let (_, cart) = post(&server, "/api/cart/items", &json!({ "product_id": 4, "quantity": 2 })).await;
    assert_eq!(cart["summary"]["item_count"], 3);
    assert_eq!(cart["summary"]["subtotal"], "169.99");

    // Anonymous shoppers are sent to sign in first; the cart is kept.
    let (status, _) = post(&server, "/api/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(server.state.cart().total_items(), 3);

    let (status, _) = post(&server, "/api/account/register", &register_form()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, order) = post(&server, "/api/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["summary"]["tax"], "13.60");
    assert_eq!(order["summary"]["total"], "183.59");
    assert_eq!(order["card"], "**** **** **** 1111");
    assert_eq!(order["lines"].as_array().unwrap().len(), 2);

    let (_, count) = get(&server, "/api/cart/count").await;
    assert_eq!(count["count"], 0);

    let (status, body) = post(&server, "/api/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cart is empty");

    server.stop();
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_login_failure_leaves_session_unset() {
    let tmp = TempDir::new().unwrap();
    let server = TestServer::start(tmp.path()).await;

    let (status, body) = post(
        &server,
        "/api/account/login",
        &json!({ "email": "ghost@aurora.test", "password": "anything" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = get(&server, "/api/account").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!server.state.auth().is_authenticated());

    server.stop();
}

// ============================================================================
// Restarts
// ============================================================================

#[tokio::test]
async fn test_state_survives_restart() {
    let tmp = TempDir::new().unwrap();

    let server = TestServer::start(tmp.path()).await;
    post(&server, "/api/cart/items", &json!({ "product_id": 1, "quantity": 2 })).await;
    post(&server, "/api/wishlist/items", &json!({ "product_id": 3 })).await;
    let (status, _) = post(&server, "/api/account/register", &register_form()).await;
    assert_eq!(status, StatusCode::CREATED);
    server.stop();

    let server = TestServer::start(tmp.path()).await;
    let (_, cart) = get(&server, "/api/cart").await;
    assert_eq!(cart["summary"]["item_count"], 2);

    let (_, saved) = get(&server, "/api/wishlist/items/3").await;
    assert_eq!(saved["in_wishlist"], true);

    let (status, user) = get(&server, "/api/account").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Jane Doe");

    // The account itself was persisted too.
    server.client.post(server.url("/api/account/logout")).send().await.unwrap();
    let (status, _) = post(
        &server,
        "/api/account/login",
        &json!({ "email": "jane@aurora.test", "password": "hunter22" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    server.stop();
}
