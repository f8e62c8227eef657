use crate::payments::error::{GatewayError, GatewayResult};
use crate::payments::http::GatewayHttpClient;
use crate::payments::sdk::{Charge, ChargeCallback, PaystackSdk, Transaction, VerifyCallback};
use crate::payments::types::{ActivityHandle, PaymentMethod};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub secret_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PaystackConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Paystack SDK backed by the REST API. Each call runs on its own task and
/// reports through the supplied callback.
#[derive(Clone)]
pub struct HttpPaystackSdk {
    inner: Arc<Inner>,
}

struct Inner {
    config: PaystackConfig,
    base_url: Url,
    http: GatewayHttpClient,
}

impl HttpPaystackSdk {
    pub fn new(config: PaystackConfig) -> GatewayResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(GatewayError::ValidationError {
                message: "PAYSTACK_SECRET_KEY is required for the paystack backend".to_string(),
                field: Some("PAYSTACK_SECRET_KEY".to_string()),
            });
        }
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| GatewayError::ValidationError {
                message: format!("invalid PAYSTACK_BASE_URL: {}", config.base_url),
                field: Some("PAYSTACK_BASE_URL".to_string()),
            })?;
        let http = GatewayHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                base_url,
                http,
            }),
        })
    }
}

impl Inner {
    /// Each segment is percent-encoded, so caller input cannot add path
    /// components of its own.
    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::ValidationError {
                message: "PAYSTACK_BASE_URL cannot be used as a base URL".to_string(),
                field: Some("PAYSTACK_BASE_URL".to_string()),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn verify_url(&self, reference: &str) -> GatewayResult<Url> {
        if matches!(reference, "." | "..") {
            return Err(GatewayError::ValidationError {
                message: format!("invalid transaction reference: {}", reference),
                field: Some("reference".to_string()),
            });
        }
        self.endpoint(&["transaction", "verify", reference])
    }

    async fn charge(&self, charge: &Charge) -> GatewayResult<PaystackEnvelope<PaystackChargeData>> {
        let (path, payload): (&[&str], JsonValue) = match charge.method {
            PaymentMethod::Card => (
                &["transaction", "charge_authorization"],
                serde_json::json!({
                    "email": charge.email,
                    "amount": charge.amount,
                    "currency": charge.currency,
                    "reference": charge.reference,
                    "authorization_code": charge.authorization_code,
                }),
            ),
            PaymentMethod::MobileMoney => (
                &["charge"],
                serde_json::json!({
                    "email": charge.email,
                    "amount": charge.amount,
                    "currency": charge.currency,
                    "reference": charge.reference,
                    "mobile_money": charge.mobile_money,
                }),
            ),
            PaymentMethod::BankTransfer => (
                &["charge"],
                serde_json::json!({
                    "email": charge.email,
                    "amount": charge.amount,
                    "currency": charge.currency,
                    "reference": charge.reference,
                    "bank": charge.bank,
                }),
            ),
        };

        self.http
            .request_json(
                reqwest::Method::POST,
                self.endpoint(path)?,
                &self.config.secret_key,
                Some(&payload),
            )
            .await
    }

    async fn verify(&self, reference: &str) -> GatewayResult<PaystackEnvelope<JsonValue>> {
        self.http
            .request_json(
                reqwest::Method::GET,
                self.verify_url(reference)?,
                &self.config.secret_key,
                None,
            )
            .await
    }
}

impl PaystackSdk for HttpPaystackSdk {
    fn charge(&self, activity: &ActivityHandle, charge: Charge, callback: ChargeCallback) {
        if !charge.missing_fields().is_empty() {
            callback.on_required_fields_empty();
            return;
        }

        let inner = Arc::clone(&self.inner);
        let activity_id = activity.id.clone();
        tokio::spawn(async move {
            match inner.charge(&charge).await {
                Ok(PaystackEnvelope {
                    status: true,
                    data: Some(data),
                    message,
                }) => {
                    if data.status == "failed" {
                        callback.on_failure(-1, data.gateway_response.unwrap_or(message));
                        return;
                    }
                    info!(
                        reference = %data.reference,
                        status = %data.status,
                        activity = %activity_id,
                        "paystack charge attempted"
                    );
                    callback.on_success(Transaction {
                        reference: data.reference,
                        status: data.status,
                        gateway_response: data.gateway_response,
                        display_text: data.display_text,
                    });
                }
                Ok(envelope) => callback.on_failure(-1, envelope.message),
                Err(e) => {
                    warn!(
                        reference = %charge.reference,
                        error = %e,
                        retryable = e.is_retryable(),
                        "paystack charge failed"
                    );
                    callback.on_failure(e.numeric_code(), e.to_string());
                }
            }
        });
    }

    fn verify(&self, reference: &str, callback: VerifyCallback) {
        let inner = Arc::clone(&self.inner);
        let reference = reference.to_string();
        tokio::spawn(async move {
            match inner.verify(&reference).await {
                Ok(PaystackEnvelope {
                    status: true,
                    data: Some(data),
                    ..
                }) => {
                    let status = data
                        .get("status")
                        .and_then(JsonValue::as_str)
                        .unwrap_or("unknown")
                        .to_string();
                    callback.on_success(status, data);
                }
                Ok(envelope) => callback.on_failure(envelope.message),
                Err(e) => {
                    warn!(reference = %reference, error = %e, "paystack verification failed");
                    callback.on_failure(e.to_string());
                }
            }
        });
    }
}

#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PaystackChargeData {
    reference: String,
    status: String,
    #[serde(default)]
    gateway_response: Option<String>,
    #[serde(default)]
    display_text: Option<String>,
}
