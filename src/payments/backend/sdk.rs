use super::{BackendKind, PaymentBackend};
use crate::error::{BridgeError, BridgeResult, Operation};
use crate::payments::reference::{self, GATEWAY_PREFIX};
use crate::payments::sdk::{
    Charge, ChargeCallback, ChargeOutcome, PaystackSdk, VerifyCallback, VerifyOutcome,
};
use crate::payments::types::{
    ActivityHandle, PaymentRequest, PaymentResult, PluginConfig, VerificationResult,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, warn};

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Forwards payments to an external SDK and waits for its single callback
pub struct SdkBackend<S> {
    sdk: S,
    callback_timeout: Duration,
}

impl<S: PaystackSdk> SdkBackend<S> {
    pub fn new(sdk: S) -> Self {
        Self {
            sdk,
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
        }
    }

    pub fn with_callback_timeout(mut self, callback_timeout: Duration) -> Self {
        self.callback_timeout = callback_timeout;
        self
    }

    async fn settle<T>(&self, operation: Operation, rx: oneshot::Receiver<T>) -> BridgeResult<T> {
        match timeout(self.callback_timeout, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(BridgeError::operation(
                operation,
                anyhow::anyhow!("gateway released the callback without reporting an outcome"),
            )),
            Err(_) => {
                warn!(
                    operation = %operation,
                    timeout_secs = self.callback_timeout.as_secs(),
                    "gateway callback timed out"
                );
                Err(BridgeError::operation(
                    operation,
                    anyhow::anyhow!(
                        "gateway did not respond within {} seconds",
                        self.callback_timeout.as_secs()
                    ),
                ))
            }
        }
    }
}

#[async_trait]
impl<S: PaystackSdk> PaymentBackend for SdkBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Paystack
    }

    fn requires_activity(&self) -> bool {
        true
    }

    async fn start_payment(
        &self,
        _config: &PluginConfig,
        activity: Option<&ActivityHandle>,
        request: PaymentRequest,
    ) -> BridgeResult<PaymentResult> {
        let activity = activity.ok_or(BridgeError::NoActivity)?;
        let reference = request
            .reference
            .clone()
            .unwrap_or_else(|| reference::generate(GATEWAY_PREFIX));
        let charge = Charge::from_request(&request, reference);

        let (callback, rx) = ChargeCallback::channel();
        self.sdk.charge(activity, charge, callback);

        match self.settle(Operation::StartPayment, rx).await? {
            ChargeOutcome::Success(transaction) => {
                info!(
                    reference = %transaction.reference,
                    status = %transaction.status,
                    "gateway reported payment success"
                );
                Ok(PaymentResult {
                    success: true,
                    message: transaction
                        .display_text
                        .or(transaction.gateway_response)
                        .unwrap_or_else(|| "Payment processed successfully".to_string()),
                    status: transaction.status,
                    reference: transaction.reference,
                    amount: request.amount,
                    currency: request.currency,
                    email: request.email,
                    payment_method: request.payment_method,
                })
            }
            ChargeOutcome::Failure { code, message } => Err(BridgeError::PaymentFailed {
                error_code: code,
                error_message: message,
            }),
            ChargeOutcome::RequiredFieldsEmpty => Err(BridgeError::RequiredFieldsEmpty),
        }
    }

    async fn verify_transaction(&self, reference: &str) -> BridgeResult<VerificationResult> {
        let (callback, rx) = VerifyCallback::channel();
        self.sdk.verify(reference, callback);

        match self.settle(Operation::VerifyTransaction, rx).await? {
            VerifyOutcome::Completed { status, data } => {
                let verified = status == "success";
                let message = data
                    .get("gateway_response")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        if verified {
                            "Transaction verified successfully".to_string()
                        } else {
                            format!("Transaction status is {}", status)
                        }
                    });
                Ok(VerificationResult {
                    verified,
                    status,
                    reference: reference.to_string(),
                    message,
                    data: Some(data),
                })
            }
            VerifyOutcome::Failed { message } => Err(BridgeError::VerificationFailed { message }),
        }
    }
}
