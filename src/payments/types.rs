use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "KES";
pub const DEFAULT_COUNTRY: &str = "KE";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Sandbox,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Live => "live",
        }
    }

    /// Whether a public key's prefix matches this environment
    pub fn matches_key(&self, public_key: &str) -> bool {
        match self {
            Environment::Sandbox => !public_key.starts_with("pk_live_"),
            Environment::Live => !public_key.starts_with("pk_test_"),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sandbox" | "test" => Ok(Environment::Sandbox),
            "live" | "production" => Ok(Environment::Live),
            _ => Err(format!("unsupported environment: {}", value)),
        }
    }
}

/// Merchant configuration set by `initialize` and read by every later call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    pub public_key: String,
    pub currency: String,
    pub country: String,
    pub environment: Environment,
}

impl PluginConfig {
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            currency: DEFAULT_CURRENCY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            environment: Environment::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.public_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    MobileMoney,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Unrecognised or absent values fall back to card
    pub fn from_argument(value: Option<&str>) -> Self {
        value
            .and_then(|v| PaymentMethod::from_str(v).ok())
            .unwrap_or_default()
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "mobile_money" | "mobilemoney" | "mpesa" | "m-pesa" => Ok(PaymentMethod::MobileMoney),
            "bank_transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            _ => Err(format!("unsupported payment method: {}", value)),
        }
    }
}

/// The foreground context the external gateway presents its UI on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityHandle {
    pub id: String,
    pub attached_at: chrono::DateTime<chrono::Utc>,
}

impl ActivityHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attached_at: chrono::Utc::now(),
        }
    }
}

/// A validated payment request. `amount` is in minor units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequest {
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub reference: Option<String>,
    pub payment_method: PaymentMethod,
    pub phone_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub bank_code: Option<String>,
    pub bank_account: Option<String>,
    pub authorization_code: Option<String>,
}

impl PaymentRequest {
    pub fn new(email: impl Into<String>, amount: i64, currency: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            amount,
            currency: currency.into(),
            reference: None,
            payment_method: PaymentMethod::Card,
            phone_number: None,
            mobile_money_provider: None,
            bank_code: None,
            bank_account: None,
            authorization_code: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    pub status: String,
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub email: String,
    pub message: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    pub status: String,
    pub reference: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}
