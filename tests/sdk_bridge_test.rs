//! Bridge behaviour with the SDK-backed backend, driven by a scripted SDK

use paystack_bridge::payments::backend::SdkBackend;
use paystack_bridge::payments::sdk::{
    Charge, ChargeCallback, PaystackSdk, Transaction, VerifyCallback,
};
use paystack_bridge::payments::types::{ActivityHandle, PaymentMethod};
use paystack_bridge::{ErrorCode, MethodCall, MethodResponse, PaymentBridge};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy)]
enum Script {
    Succeed,
    Decline,
    CheckFields,
}

/// Every call that reached the SDK
#[derive(Default)]
struct Calls {
    charges: Mutex<Vec<Charge>>,
    verifications: Mutex<Vec<String>>,
}

/// Records calls and answers charges on a separate task, like the real SDK
struct ScriptedSdk {
    script: Script,
    calls: Arc<Calls>,
}

impl PaystackSdk for ScriptedSdk {
    fn charge(&self, _activity: &ActivityHandle, charge: Charge, callback: ChargeCallback) {
        self.calls.charges.lock().unwrap().push(charge.clone());
        let script = self.script;
        tokio::spawn(async move {
            match script {
                Script::Succeed => callback.on_success(Transaction {
                    reference: charge.reference.clone(),
                    status: "success".to_string(),
                    gateway_response: Some("Approved".to_string()),
                    display_text: None,
                }),
                Script::Decline => callback.on_failure(402, "Insufficient funds"),
                Script::CheckFields => {
                    if charge.missing_fields().is_empty() {
                        callback.on_success(Transaction {
                            reference: charge.reference.clone(),
                            status: "pay_offline".to_string(),
                            gateway_response: None,
                            display_text: None,
                        })
                    } else {
                        callback.on_required_fields_empty()
                    }
                }
            }
        });
    }

    fn verify(&self, reference: &str, callback: VerifyCallback) {
        self.calls
            .verifications
            .lock()
            .unwrap()
            .push(reference.to_string());
        if reference == "unknown" {
            callback.on_failure("Transaction reference not found");
        } else {
            callback.on_success(
                "success",
                json!({"status": "success", "reference": reference, "amount": 500}),
            );
        }
    }
}

async fn bridge(script: Script) -> (PaymentBridge, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let sdk = ScriptedSdk {
        script,
        calls: Arc::clone(&calls),
    };
    let bridge = PaymentBridge::new(Box::new(SdkBackend::new(sdk)));
    bridge
        .handle(&MethodCall::new("initialize", json!({"publicKey": "pk_test_abc"})))
        .await;
    (bridge, calls)
}

#[tokio::test]
async fn test_payment_without_activity_is_rejected() {
    let (bridge, calls) = bridge(Script::Succeed).await;
    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::NoActivity));
    assert!(calls.charges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_not_initialized_is_checked_before_activity() {
    let bridge = PaymentBridge::new(Box::new(SdkBackend::new(ScriptedSdk {
        script: Script::Succeed,
        calls: Arc::new(Calls::default()),
    })));
    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::NotInitialized));
}

#[tokio::test]
async fn test_successful_charge_after_activity_attached() {
    let (bridge, calls) = bridge(Script::Succeed).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;

    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({
                "email": "a@b.com",
                "amount": 500,
                "reference": "ref1",
                "paymentMethod": "mobile_money",
                "phoneNumber": "254700000000"
            }),
        ))
        .await;

    match response {
        MethodResponse::Success(value) => {
            assert_eq!(value["success"], true);
            assert_eq!(value["reference"], "ref1");
            assert_eq!(value["message"], "Approved");
        }
        other => panic!("expected success, got {:?}", other),
    }

    let charges = calls.charges.lock().unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].method, PaymentMethod::MobileMoney);
    let mobile = charges[0].mobile_money.as_ref().expect("mobile money details");
    assert_eq!(mobile.phone.as_deref(), Some("254700000000"));
}

#[tokio::test]
async fn test_declined_charge_carries_error_details() {
    let (bridge, _) = bridge(Script::Decline).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;

    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;

    match response {
        MethodResponse::Error {
            code,
            message,
            details,
        } => {
            assert_eq!(code, ErrorCode::PaymentFailed);
            assert_eq!(message, "Insufficient funds");
            assert_eq!(
                details,
                Some(json!({"errorCode": 402, "errorMessage": "Insufficient funds"}))
            );
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bank_transfer_without_account_reports_required_fields() {
    let (bridge, _) = bridge(Script::CheckFields).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;

    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500, "paymentMethod": "bank_transfer", "bankCode": "01"}),
        ))
        .await;

    match response {
        MethodResponse::Error { code, details, .. } => {
            assert_eq!(code, ErrorCode::RequiredFieldsEmpty);
            assert!(details.is_none());
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_detached_activity_blocks_payments_again() {
    let (bridge, _) = bridge(Script::Succeed).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;
    bridge.detach_activity().await;

    let response = bridge
        .handle(&MethodCall::new(
            "startPayment",
            json!({"email": "a@b.com", "amount": 500}),
        ))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::NoActivity));
}

#[tokio::test]
async fn test_verification_outcomes() {
    let (bridge, _) = bridge(Script::Succeed).await;

    match bridge
        .handle(&MethodCall::new("verifyTransaction", json!({"reference": "ref1"})))
        .await
    {
        MethodResponse::Success(value) => {
            assert_eq!(value["verified"], true);
            assert_eq!(value["data"]["amount"], 500);
        }
        other => panic!("expected success, got {:?}", other),
    }

    let response = bridge
        .handle(&MethodCall::new("verifyTransaction", json!({"reference": "unknown"})))
        .await;
    assert_eq!(response.error_code(), Some(ErrorCode::VerificationFailed));
}

#[tokio::test]
async fn test_invalid_payment_arguments_never_reach_the_sdk() {
    let (bridge, calls) = bridge(Script::Succeed).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;

    let cases = [
        (json!({"amount": 500}), ErrorCode::InvalidEmail),
        (json!({"email": "", "amount": 500}), ErrorCode::InvalidEmail),
        (json!({"email": "a@b.com"}), ErrorCode::InvalidAmount),
        (json!({"email": "a@b.com", "amount": 0}), ErrorCode::InvalidAmount),
        (json!({"email": "a@b.com", "amount": -5}), ErrorCode::InvalidAmount),
    ];
    for (arguments, expected) in cases {
        let response = bridge
            .handle(&MethodCall::new("startPayment", arguments.clone()))
            .await;
        assert_eq!(response.error_code(), Some(expected), "{}", arguments);
    }

    assert!(calls.charges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_reference_never_reaches_the_sdk() {
    let (bridge, calls) = bridge(Script::Succeed).await;
    bridge.attach_activity(ActivityHandle::new("main")).await;

    for arguments in [json!({"reference": ""}), json!({})] {
        let response = bridge
            .handle(&MethodCall::new("verifyTransaction", arguments))
            .await;
        assert_eq!(response.error_code(), Some(ErrorCode::InvalidReference));
    }
    assert!(calls.verifications.lock().unwrap().is_empty());

    bridge
        .handle(&MethodCall::new("verifyTransaction", json!({"reference": "ref1"})))
        .await;
    assert_eq!(*calls.verifications.lock().unwrap(), vec!["ref1".to_string()]);
}
