//! Contract of the external payment SDK
//!
//! The SDK is driven by callbacks: the bridge builds a `Charge`, hands it over
//! together with a `ChargeCallback`, and the SDK later reports exactly one
//! outcome. Callbacks are consumed when they fire, so a second report cannot
//! be expressed.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

use crate::payments::types::{ActivityHandle, PaymentMethod, PaymentRequest};

pub const DEFAULT_MOBILE_MONEY_PROVIDER: &str = "mpesa";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MobileMoneyDetails {
    pub phone: Option<String>,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankDetails {
    pub code: Option<String>,
    pub account_number: Option<String>,
}

/// A transaction to be initiated against the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charge {
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    pub method: PaymentMethod,
    pub mobile_money: Option<MobileMoneyDetails>,
    pub bank: Option<BankDetails>,
    pub authorization_code: Option<String>,
}

impl Charge {
    pub fn new(
        email: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            amount,
            currency: currency.into(),
            reference: reference.into(),
            method: PaymentMethod::Card,
            mobile_money: None,
            bank: None,
            authorization_code: None,
        }
    }

    /// Build a charge from a validated request, attaching the sub-object its
    /// payment method needs.
    pub fn from_request(request: &PaymentRequest, reference: String) -> Self {
        let charge = Charge::new(
            request.email.clone(),
            request.amount,
            request.currency.clone(),
            reference,
        );
        match request.payment_method {
            PaymentMethod::Card => charge.with_authorization(request.authorization_code.clone()),
            PaymentMethod::MobileMoney => charge.with_mobile_money(MobileMoneyDetails {
                phone: request.phone_number.clone(),
                provider: request
                    .mobile_money_provider
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MOBILE_MONEY_PROVIDER.to_string()),
            }),
            PaymentMethod::BankTransfer => charge.with_bank(BankDetails {
                code: request.bank_code.clone(),
                account_number: request.bank_account.clone(),
            }),
        }
    }

    pub fn with_mobile_money(mut self, details: MobileMoneyDetails) -> Self {
        self.method = PaymentMethod::MobileMoney;
        self.mobile_money = Some(details);
        self
    }

    pub fn with_bank(mut self, details: BankDetails) -> Self {
        self.method = PaymentMethod::BankTransfer;
        self.bank = Some(details);
        self
    }

    pub fn with_authorization(mut self, authorization_code: Option<String>) -> Self {
        self.method = PaymentMethod::Card;
        self.authorization_code = authorization_code;
        self
    }

    /// Fields the gateway needs but the charge does not carry
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fn blank(value: Option<&String>) -> bool {
            value.map(|v| v.trim().is_empty()).unwrap_or(true)
        }

        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.amount <= 0 {
            missing.push("amount");
        }
        match self.method {
            PaymentMethod::Card => {
                if blank(self.authorization_code.as_ref()) {
                    missing.push("authorization_code");
                }
            }
            PaymentMethod::MobileMoney => {
                if blank(self.mobile_money.as_ref().and_then(|m| m.phone.as_ref())) {
                    missing.push("phone");
                }
            }
            PaymentMethod::BankTransfer => {
                let bank = self.bank.as_ref();
                if blank(bank.and_then(|b| b.code.as_ref())) {
                    missing.push("bank_code");
                }
                if blank(bank.and_then(|b| b.account_number.as_ref())) {
                    missing.push("bank_account");
                }
            }
        }
        missing
    }
}

/// Transaction state reported by the gateway on success
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub reference: String,
    pub status: String,
    pub gateway_response: Option<String>,
    pub display_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Success(Transaction),
    Failure { code: i32, message: String },
    RequiredFieldsEmpty,
}

/// Receiver side of a charge. Fires at most once.
#[derive(Debug)]
pub struct ChargeCallback {
    tx: oneshot::Sender<ChargeOutcome>,
}

impl ChargeCallback {
    pub fn channel() -> (Self, oneshot::Receiver<ChargeOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn on_success(self, transaction: Transaction) {
        self.settle(ChargeOutcome::Success(transaction));
    }

    pub fn on_failure(self, code: i32, message: impl Into<String>) {
        self.settle(ChargeOutcome::Failure {
            code,
            message: message.into(),
        });
    }

    pub fn on_required_fields_empty(self) {
        self.settle(ChargeOutcome::RequiredFieldsEmpty);
    }

    fn settle(self, outcome: ChargeOutcome) {
        // receiver gone means the caller already timed out
        let _ = self.tx.send(outcome);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Completed { status: String, data: JsonValue },
    Failed { message: String },
}

#[derive(Debug)]
pub struct VerifyCallback {
    tx: oneshot::Sender<VerifyOutcome>,
}

impl VerifyCallback {
    pub fn channel() -> (Self, oneshot::Receiver<VerifyOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn on_success(self, status: impl Into<String>, data: JsonValue) {
        let _ = self.tx.send(VerifyOutcome::Completed {
            status: status.into(),
            data,
        });
    }

    pub fn on_failure(self, message: impl Into<String>) {
        let _ = self.tx.send(VerifyOutcome::Failed {
            message: message.into(),
        });
    }
}

/// The external gateway SDK. Implementations report through the callback,
/// possibly from another task.
pub trait PaystackSdk: Send + Sync {
    fn charge(&self, activity: &ActivityHandle, charge: Charge, callback: ChargeCallback);

    fn verify(&self, reference: &str, callback: VerifyCallback);
}
