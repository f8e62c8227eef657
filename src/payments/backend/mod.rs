//! Payment backends
//!
//! The bridge talks to one `PaymentBackend`, picked at construction time:
//! the simulated stub for offline development, or the SDK-backed backend that
//! forwards to the external gateway.

mod sdk;
mod simulated;

pub use sdk::SdkBackend;
pub use simulated::SimulatedBackend;

use crate::error::BridgeResult;
use crate::payments::reference::{self, ACCESS_CODE_PREFIX};
use crate::payments::types::{
    ActivityHandle, PaymentRequest, PaymentResult, PluginConfig, VerificationResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Simulated,
    Paystack,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Simulated => "simulated",
            BackendKind::Paystack => "paystack",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "simulated" | "standalone" => Ok(BackendKind::Simulated),
            "paystack" | "sdk" => Ok(BackendKind::Paystack),
            _ => Err(format!("unsupported backend: {}", value)),
        }
    }
}

#[async_trait]
pub trait PaymentBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Whether payments need an attached foreground activity
    fn requires_activity(&self) -> bool;

    async fn start_payment(
        &self,
        config: &PluginConfig,
        activity: Option<&ActivityHandle>,
        request: PaymentRequest,
    ) -> BridgeResult<PaymentResult>;

    async fn verify_transaction(&self, reference: &str) -> BridgeResult<VerificationResult>;

    /// Placeholder access code; no backend obtains one from the gateway
    fn access_code(&self) -> BridgeResult<String> {
        Ok(reference::generate(ACCESS_CODE_PREFIX))
    }
}
