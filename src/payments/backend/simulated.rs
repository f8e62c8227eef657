use super::{BackendKind, PaymentBackend};
use crate::error::BridgeResult;
use crate::payments::reference::{self, SIMULATED_PREFIX};
use crate::payments::types::{
    ActivityHandle, PaymentRequest, PaymentResult, PluginConfig, VerificationResult,
};
use async_trait::async_trait;
use tracing::debug;

/// Offline stub: every payment and verification succeeds without contacting
/// anything. Not a model of real payment semantics.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentBackend for SimulatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulated
    }

    fn requires_activity(&self) -> bool {
        false
    }

    async fn start_payment(
        &self,
        _config: &PluginConfig,
        _activity: Option<&ActivityHandle>,
        request: PaymentRequest,
    ) -> BridgeResult<PaymentResult> {
        let reference = request
            .reference
            .unwrap_or_else(|| reference::generate(SIMULATED_PREFIX));
        debug!(reference = %reference, "simulating payment");

        Ok(PaymentResult {
            success: true,
            status: "success".to_string(),
            reference,
            amount: request.amount,
            currency: request.currency,
            email: request.email,
            message: "Payment processed successfully".to_string(),
            payment_method: request.payment_method,
        })
    }

    async fn verify_transaction(&self, reference: &str) -> BridgeResult<VerificationResult> {
        Ok(VerificationResult {
            verified: true,
            status: "success".to_string(),
            reference: reference.to_string(),
            message: "Transaction verified successfully".to_string(),
            data: None,
        })
    }
}
