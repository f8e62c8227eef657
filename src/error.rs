//! Error handling for the payment bridge
//!
//! Every failure a bridge operation can produce is a `BridgeError` variant. Each
//! variant maps to one stable `ErrorCode` string the application layer branches on,
//! a human-readable message, and (only for gateway failures) structured details.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::channel::MethodResponse;

/// Stable error codes returned over the method channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors
    #[serde(rename = "INVALID_PUBLIC_KEY")]
    InvalidPublicKey,
    #[serde(rename = "INVALID_EMAIL")]
    InvalidEmail,
    #[serde(rename = "INVALID_AMOUNT")]
    InvalidAmount,
    #[serde(rename = "INVALID_REFERENCE")]
    InvalidReference,

    // Precondition errors
    #[serde(rename = "NOT_INITIALIZED")]
    NotInitialized,
    #[serde(rename = "NO_ACTIVITY")]
    NoActivity,

    // Gateway outcomes
    #[serde(rename = "PAYMENT_FAILED")]
    PaymentFailed,
    #[serde(rename = "REQUIRED_FIELDS_EMPTY")]
    RequiredFieldsEmpty,
    #[serde(rename = "VERIFICATION_FAILED")]
    VerificationFailed,

    // Per-operation wrappers for unexpected failures
    #[serde(rename = "INITIALIZATION_ERROR")]
    InitializationError,
    #[serde(rename = "PAYMENT_PROCESSING_ERROR")]
    PaymentProcessingError,
    #[serde(rename = "VERIFICATION_ERROR")]
    VerificationError,
    #[serde(rename = "ACCESS_CODE_ERROR")]
    AccessCodeError,

    // Dispatch boundary safety net
    #[serde(rename = "PLUGIN_ERROR")]
    PluginError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPublicKey => "INVALID_PUBLIC_KEY",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidReference => "INVALID_REFERENCE",
            ErrorCode::NotInitialized => "NOT_INITIALIZED",
            ErrorCode::NoActivity => "NO_ACTIVITY",
            ErrorCode::PaymentFailed => "PAYMENT_FAILED",
            ErrorCode::RequiredFieldsEmpty => "REQUIRED_FIELDS_EMPTY",
            ErrorCode::VerificationFailed => "VERIFICATION_FAILED",
            ErrorCode::InitializationError => "INITIALIZATION_ERROR",
            ErrorCode::PaymentProcessingError => "PAYMENT_PROCESSING_ERROR",
            ErrorCode::VerificationError => "VERIFICATION_ERROR",
            ErrorCode::AccessCodeError => "ACCESS_CODE_ERROR",
            ErrorCode::PluginError => "PLUGIN_ERROR",
        }
    }

    /// Broad category, used by hosts that need to pick a transport status
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::InvalidPublicKey
            | ErrorCode::InvalidEmail
            | ErrorCode::InvalidAmount
            | ErrorCode::InvalidReference => ErrorCategory::Validation,
            ErrorCode::NotInitialized | ErrorCode::NoActivity => ErrorCategory::Precondition,
            ErrorCode::PaymentFailed
            | ErrorCode::RequiredFieldsEmpty
            | ErrorCode::VerificationFailed => ErrorCategory::Gateway,
            ErrorCode::InitializationError
            | ErrorCode::PaymentProcessingError
            | ErrorCode::VerificationError
            | ErrorCode::AccessCodeError
            | ErrorCode::PluginError => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller can fix the input and retry
    Validation,
    /// Caller must re-sequence calls (initialize first, attach a foreground context)
    Precondition,
    /// Outcome reported by the external gateway
    Gateway,
    /// Unexpected failure inside the bridge
    Internal,
}

/// The operations exposed over the method channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Initialize,
    StartPayment,
    VerifyTransaction,
    GetAccessCode,
}

impl Operation {
    /// Resolve a channel method name. `startPayment` and `processPayment` are aliases.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "initialize" => Some(Operation::Initialize),
            "startPayment" | "processPayment" => Some(Operation::StartPayment),
            "verifyTransaction" => Some(Operation::VerifyTransaction),
            "getAccessCode" => Some(Operation::GetAccessCode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::StartPayment => "startPayment",
            Operation::VerifyTransaction => "verifyTransaction",
            Operation::GetAccessCode => "getAccessCode",
        }
    }

    /// Code reported when the operation fails for a reason it did not anticipate
    pub fn failure_code(&self) -> ErrorCode {
        match self {
            Operation::Initialize => ErrorCode::InitializationError,
            Operation::StartPayment => ErrorCode::PaymentProcessingError,
            Operation::VerifyTransaction => ErrorCode::VerificationError,
            Operation::GetAccessCode => ErrorCode::AccessCodeError,
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::Initialize => "Failed to initialize",
            Operation::StartPayment => "Failed to process payment",
            Operation::VerifyTransaction => "Failed to verify transaction",
            Operation::GetAccessCode => "Failed to get access code",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Public key cannot be null or empty")]
    InvalidPublicKey,

    #[error("Flutter Paystack not initialized")]
    NotInitialized,

    #[error("No foreground activity is attached")]
    NoActivity,

    #[error("Email cannot be null or empty")]
    InvalidEmail,

    #[error("Amount must be greater than 0")]
    InvalidAmount,

    #[error("Reference cannot be null or empty")]
    InvalidReference,

    #[error("Payment failed: {error_message}")]
    PaymentFailed {
        error_code: i32,
        error_message: String,
    },

    #[error("Required fields are empty")]
    RequiredFieldsEmpty,

    #[error("Transaction verification failed: {message}")]
    VerificationFailed { message: String },

    #[error("{operation} failed: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error processing method call: {message}")]
    Plugin { message: String },
}

impl BridgeError {
    pub fn operation(operation: Operation, source: impl Into<anyhow::Error>) -> Self {
        BridgeError::Operation {
            operation,
            source: source.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::InvalidPublicKey => ErrorCode::InvalidPublicKey,
            BridgeError::NotInitialized => ErrorCode::NotInitialized,
            BridgeError::NoActivity => ErrorCode::NoActivity,
            BridgeError::InvalidEmail => ErrorCode::InvalidEmail,
            BridgeError::InvalidAmount => ErrorCode::InvalidAmount,
            BridgeError::InvalidReference => ErrorCode::InvalidReference,
            BridgeError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            BridgeError::RequiredFieldsEmpty => ErrorCode::RequiredFieldsEmpty,
            BridgeError::VerificationFailed { .. } => ErrorCode::VerificationFailed,
            BridgeError::Operation { operation, .. } => operation.failure_code(),
            BridgeError::Plugin { .. } => ErrorCode::PluginError,
        }
    }

    /// Message shown to the application layer
    pub fn user_message(&self) -> String {
        match self {
            BridgeError::PaymentFailed { error_message, .. } => error_message.clone(),
            BridgeError::VerificationFailed { message } => message.clone(),
            BridgeError::Operation { operation, source } => {
                format!("{}: {}", operation.failure_prefix(), source)
            }
            other => other.to_string(),
        }
    }

    /// Structured detail, only attached to gateway payment failures
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            BridgeError::PaymentFailed {
                error_code,
                error_message,
            } => Some(json!({
                "errorCode": error_code,
                "errorMessage": error_message,
            })),
            _ => None,
        }
    }

    pub fn into_response(self) -> MethodResponse {
        MethodResponse::Error {
            code: self.code(),
            message: self.user_message(),
            details: self.details(),
        }
    }
}

/// Process configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}
