//! Dispatch contract of the bridge with the simulated backend
//!
//! Tests cover:
//! - initialize validation and last-write-wins configuration
//! - payment validation and preconditions
//! - simulated payment and verification results
//! - unknown methods

use paystack_bridge::{ErrorCode, MethodCall, MethodResponse, PaymentBridge};
use serde_json::{json, Value};

async fn initialized_bridge() -> PaymentBridge {
    let bridge = PaymentBridge::simulated();
    let response = bridge
        .handle(&MethodCall::new("initialize", json!({"publicKey": "pk_test"})))
        .await;
    assert!(response.is_success());
    bridge
}

fn success_value(response: MethodResponse) -> Value {
    match response {
        MethodResponse::Success(value) => value,
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_initialize_rejects_missing_or_empty_public_key() {
    for args in [json!({}), json!({"publicKey": ""}), json!({"publicKey": null})] {
        let bridge = PaymentBridge::simulated();
        let response = bridge.handle(&MethodCall::new("initialize", args)).await;
        assert_eq!(response.error_code(), Some(ErrorCode::InvalidPublicKey));
        assert!(bridge.config().await.is_none());
    }
}

#[tokio::test]
async fn test_initialize_returns_confirmation_and_defaults() {
    let bridge = PaymentBridge::simulated();
    let response = bridge
        .handle(&MethodCall::new("initialize", json!({"publicKey": "pk_test"})))
        .await;
    assert_eq!(
        success_value(response),
        json!("Flutter Paystack initialized successfully")
    );

    let config = bridge.config().await.expect("configuration stored");
    assert_eq!(config.currency, "KES");
    assert_eq!(config.country, "KE");
    assert_eq!(config.environment.as_str(), "sandbox");
}

#[tokio::test]
async fn test_initialize_twice_keeps_last_values() {
    let bridge = PaymentBridge::simulated();
    bridge
        .handle(&MethodCall::new(
            "initialize",
            json!({"publicKey": "pk_first", "currency": "NGN", "country": "NG"}),
        ))
        .await;
    bridge
        .handle(&MethodCall::new("initialize", json!({"publicKey": "pk_second"})))
        .await;

    let config = bridge.config().await.expect("configuration stored");
    assert_eq!(config.public_key, "pk_second");
    // not merged with the first call
    assert_eq!(config.currency, "KES");
    assert_eq!(config.country, "KE");
}

#[tokio::test]
async fn test_payment_before_initialize_is_rejected() {
    let bridge = PaymentBridge::simulated();
    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::NotInitialized));
}

#[tokio::test]
async fn test_non_positive_amount_is_rejected() {
    let bridge = initialized_bridge().await;
    for amount in [json!(0), json!(-100), json!("500"), Value::Null] {
        let response = bridge
            .handle(&MethodCall::new(
                "startPayment",
                json!({"email": "a@b.com", "amount": amount}),
            ))
            .await;
        assert_eq!(response.error_code(), Some(ErrorCode::InvalidAmount));
    }
}

#[tokio::test]
async fn test_empty_email_is_rejected() {
    let bridge = initialized_bridge().await;
    for email in [json!(""), Value::Null] {
        let response = bridge
            .handle(&MethodCall::new(
                "processPayment",
                json!({"email": email, "amount": 500}),
            ))
            .await;
        assert_eq!(response.error_code(), Some(ErrorCode::InvalidEmail));
    }
}

#[tokio::test]
async fn test_simulated_payment_result() {
    let bridge = initialized_bridge().await;
    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500, "reference": "ref1"}),
        ))
        .await;

    let value = success_value(response);
    assert_eq!(value["success"], true);
    assert_eq!(value["reference"], "ref1");
    assert_eq!(value["amount"], 500);
    assert_eq!(value["currency"], "KES");
    assert_eq!(value["email"], "a@b.com");
    assert_eq!(value["paymentMethod"], "card");
}

#[tokio::test]
async fn test_simulated_payment_uses_currency_argument() {
    let bridge = initialized_bridge().await;
    let value = success_value(
        bridge
            .handle(&MethodCall::new(
                "startPayment",
                json!({"email": "a@b.com", "amount": 500, "currency": "USD"}),
            ))
            .await,
    );
    assert_eq!(value["currency"], "USD");
}

#[tokio::test]
async fn test_generated_references_are_distinct() {
    let bridge = initialized_bridge().await;
    let call = MethodCall::new("startPayment", json!({"email": "a@b.com", "amount": 500}));

    let first = success_value(bridge.handle(&call).await);
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = success_value(bridge.handle(&call).await);

    let first = first["reference"].as_str().expect("reference");
    let second = second["reference"].as_str().expect("reference");
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unknown_method_is_not_implemented() {
    let bridge = initialized_bridge().await;
    let response = bridge
        .handle(&MethodCall::new("refundTransaction", json!({"reference": "ref1"})))
        .await;
    assert_eq!(response, MethodResponse::NotImplemented);
    assert_eq!(response.error_code(), None);
}

#[tokio::test]
async fn test_verify_requires_reference() {
    let bridge = initialized_bridge().await;
    let response = bridge
        .handle(&MethodCall::new("verifyTransaction", json!({"reference": ""})))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::InvalidReference));
}

#[tokio::test]
async fn test_simulated_verification() {
    let bridge = initialized_bridge().await;
    let value = success_value(
        bridge
            .handle(&MethodCall::new("verifyTransaction", json!({"reference": "ref1"})))
            .await,
    );
    assert_eq!(value["verified"], true);
    assert_eq!(value["status"], "success");
    assert_eq!(value["reference"], "ref1");
}

#[tokio::test]
async fn test_access_code_needs_no_arguments() {
    let bridge = PaymentBridge::simulated();
    let value = success_value(bridge.handle(&MethodCall::new("getAccessCode", Value::Null)).await);
    assert!(value.as_str().expect("string access code").starts_with("ac_"));
}

#[tokio::test]
async fn test_detach_from_engine_clears_configuration() {
    let bridge = initialized_bridge().await;
    bridge.detach_from_engine().await;
    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::NotInitialized));
}
