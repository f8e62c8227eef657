//! The payment bridge
//!
//! Receives method calls from the application layer, validates arguments,
//! dispatches to the configured `PaymentBackend` and shapes the result into a
//! `MethodResponse`.

use futures::FutureExt;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::channel::{Arguments, MethodCall, MethodResponse};
use crate::config::GatewayConfig;
use crate::error::{BridgeError, BridgeResult, Operation};
use crate::logging::mask_key;
use crate::payments::backend::{BackendKind, PaymentBackend, SdkBackend, SimulatedBackend};
use crate::payments::error::GatewayResult;
use crate::payments::providers::HttpPaystackSdk;
use crate::payments::types::{
    ActivityHandle, Environment, PaymentMethod, PaymentRequest, PaymentResult, PluginConfig,
    VerificationResult,
};

pub struct PaymentBridge {
    backend: Box<dyn PaymentBackend>,
    config: RwLock<Option<PluginConfig>>,
    activity: RwLock<Option<ActivityHandle>>,
}

impl PaymentBridge {
    pub fn new(backend: Box<dyn PaymentBackend>) -> Self {
        Self {
            backend,
            config: RwLock::new(None),
            activity: RwLock::new(None),
        }
    }

    pub fn simulated() -> Self {
        Self::new(Box::new(SimulatedBackend::new()))
    }

    /// Build the bridge with the backend selected in configuration
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let backend: Box<dyn PaymentBackend> = match config.backend {
            BackendKind::Simulated => Box::new(SimulatedBackend::new()),
            BackendKind::Paystack => Box::new(
                SdkBackend::new(HttpPaystackSdk::new(config.paystack.clone())?)
                    .with_callback_timeout(Duration::from_secs(config.callback_timeout_secs)),
            ),
        };
        Ok(Self::new(backend))
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub async fn config(&self) -> Option<PluginConfig> {
        self.config.read().await.clone()
    }

    pub async fn activity(&self) -> Option<ActivityHandle> {
        self.activity.read().await.clone()
    }

    /// Attach (or re-attach after a configuration change) the foreground activity
    pub async fn attach_activity(&self, activity: ActivityHandle) {
        info!(activity = %activity.id, "activity attached");
        *self.activity.write().await = Some(activity);
    }

    pub async fn detach_activity(&self) -> Option<ActivityHandle> {
        let previous = self.activity.write().await.take();
        if let Some(activity) = &previous {
            info!(activity = %activity.id, "activity detached");
        }
        previous
    }

    /// Plugin teardown: drops the stored configuration and any attached activity
    pub async fn detach_from_engine(&self) {
        *self.config.write().await = None;
        *self.activity.write().await = None;
        info!("bridge detached from engine");
    }

    /// Dispatch one method call. Never fails: every path yields a response.
    pub async fn handle(&self, call: &MethodCall) -> MethodResponse {
        let Some(operation) = Operation::from_method(&call.method) else {
            debug!(method = %call.method, "method not implemented");
            return MethodResponse::NotImplemented;
        };

        let outcome = AssertUnwindSafe(self.dispatch(operation, call.args()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => MethodResponse::Success(value),
            Ok(Err(e)) => {
                warn!(
                    method = %call.method,
                    code = %e.code(),
                    error = %e,
                    "method call failed"
                );
                e.into_response()
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(method = %call.method, panic = %message, "method call panicked");
                BridgeError::Plugin { message }.into_response()
            }
        }
    }

    async fn dispatch(&self, operation: Operation, args: Arguments<'_>) -> BridgeResult<JsonValue> {
        match operation {
            Operation::Initialize => self.initialize(args).await.map(JsonValue::String),
            Operation::StartPayment => to_json(operation, self.start_payment(args).await?),
            Operation::VerifyTransaction => {
                to_json(operation, self.verify_transaction(args).await?)
            }
            Operation::GetAccessCode => self.get_access_code().map(JsonValue::String),
        }
    }

    /// Store the merchant configuration. Replaces any previous configuration.
    pub async fn initialize(&self, args: Arguments<'_>) -> BridgeResult<String> {
        let public_key = args
            .non_empty("publicKey")
            .ok_or(BridgeError::InvalidPublicKey)?;

        let mut config = PluginConfig::new(public_key);
        if let Some(currency) = args.non_empty("currency") {
            config.currency = currency.to_string();
        }
        if let Some(country) = args.non_empty("country") {
            config.country = country.to_string();
        }
        if let Some(environment) = args.non_empty("environment") {
            config.environment = Environment::from_str(environment)
                .map_err(|e| BridgeError::operation(Operation::Initialize, anyhow::anyhow!(e)))?;
        }

        if !config.environment.matches_key(&config.public_key) {
            warn!(
                environment = %config.environment,
                public_key = %mask_key(&config.public_key),
                "public key does not match the configured environment"
            );
        }

        info!(
            public_key = %mask_key(&config.public_key),
            currency = %config.currency,
            country = %config.country,
            environment = %config.environment,
            backend = %self.backend.kind(),
            "bridge initialized"
        );
        *self.config.write().await = Some(config);

        Ok("Flutter Paystack initialized successfully".to_string())
    }

    pub async fn start_payment(&self, args: Arguments<'_>) -> BridgeResult<PaymentResult> {
        let config = self
            .config()
            .await
            .filter(PluginConfig::is_ready)
            .ok_or(BridgeError::NotInitialized)?;

        let activity = self.activity().await;
        if self.backend.requires_activity() && activity.is_none() {
            return Err(BridgeError::NoActivity);
        }

        let request = payment_request(&config, args)?;
        info!(
            amount = request.amount,
            currency = %request.currency,
            payment_method = request.payment_method.as_str(),
            reference = request.reference.as_deref().unwrap_or("<generated>"),
            "processing payment"
        );

        self.backend
            .start_payment(&config, activity.as_ref(), request)
            .await
    }

    pub async fn verify_transaction(&self, args: Arguments<'_>) -> BridgeResult<VerificationResult> {
        let reference = args
            .non_empty("reference")
            .ok_or(BridgeError::InvalidReference)?;

        info!(reference = %reference, "verifying transaction");
        self.backend.verify_transaction(reference).await
    }

    pub fn get_access_code(&self) -> BridgeResult<String> {
        self.backend.access_code()
    }
}

/// Validate payment arguments. Email is checked before amount.
fn payment_request(config: &PluginConfig, args: Arguments<'_>) -> BridgeResult<PaymentRequest> {
    let email = args.non_empty("email").ok_or(BridgeError::InvalidEmail)?;
    let amount = args
        .integer("amount")
        .filter(|amount| *amount > 0)
        .ok_or(BridgeError::InvalidAmount)?;
    let currency = args
        .non_empty("currency")
        .unwrap_or(config.currency.as_str());

    let mut request = PaymentRequest::new(email, amount, currency);
    request.reference = args.non_empty("reference").map(str::to_string);
    request.payment_method = PaymentMethod::from_argument(args.string("paymentMethod"));
    request.phone_number = args
        .first_non_empty(&["phoneNumber", "phone"])
        .map(str::to_string);
    request.mobile_money_provider = args.non_empty("provider").map(str::to_string);
    request.bank_code = args.non_empty("bankCode").map(str::to_string);
    request.bank_account = args
        .first_non_empty(&["bankAccount", "accountNumber"])
        .map(str::to_string);
    request.authorization_code = args.non_empty("authorizationCode").map(str::to_string);
    Ok(request)
}

fn to_json<T: Serialize>(operation: Operation, value: T) -> BridgeResult<JsonValue> {
    serde_json::to_value(value).map_err(|e| BridgeError::operation(operation, e))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
