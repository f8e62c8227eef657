//! Integration tests for the HTTP method channel
//!
//! Tests cover:
//! - success and error envelopes
//! - not-implemented methods
//! - unknown channels
//! - activity lifecycle and health

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use paystack_bridge::api::router;
use paystack_bridge::PaymentBridge;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app() -> (Router, Arc<PaymentBridge>) {
    let bridge = Arc::new(PaymentBridge::simulated());
    (router(Arc::clone(&bridge)), bridge)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/channel/flutter_paystack",
            body,
        ))
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_initialize_then_pay() {
    let (app, _) = create_test_app();

    let (status, json) = call(
        &app,
        json!({"method": "initialize", "arguments": {"publicKey": "pk_test"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["result"], "Flutter Paystack initialized successfully");

    let (status, json) = call(
        &app,
        json!({
            "method": "startPayment",
            "arguments": {"email": "a@b.com", "amount": 500, "reference": "ref1"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["reference"], "ref1");
    assert_eq!(json["result"]["currency"], "KES");
}

#[tokio::test]
async fn test_error_envelope() {
    let (app, _) = create_test_app();

    let (status, json) = call(
        &app,
        json!({"method": "startPayment", "arguments": {"email": "a@b.com", "amount": 500}}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "NOT_INITIALIZED");
    assert_eq!(json["message"], "Flutter Paystack not initialized");

    let (status, json) = call(&app, json!({"method": "initialize", "arguments": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_PUBLIC_KEY");
}

#[tokio::test]
async fn test_not_implemented_method() {
    let (app, _) = create_test_app();
    let (status, json) = call(&app, json!({"method": "chargeCard"})).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json, json!({"status": "not_implemented", "method": "chargeCard"}));
}

#[tokio::test]
async fn test_unknown_channel() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/channel/other_plugin",
            json!({"method": "initialize"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_lifecycle() {
    let (app, bridge) = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/lifecycle/activity",
            json!({"id": "MainActivity"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        bridge.activity().await.map(|a| a.id).as_deref(),
        Some("MainActivity")
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/lifecycle/activity")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(bridge.activity().await.is_none());
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["backend"], "simulated");
    assert_eq!(json["status"], "Degraded");
}
