//! Method channel codec
//!
//! The application layer sends a named method with a key-value argument bag and
//! receives exactly one of: a success value, an error triple, or a not-implemented
//! signal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorCode;

/// Channel name the bridge registers under
pub const CHANNEL_NAME: &str = "flutter_paystack";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            method: method.into(),
            arguments,
        }
    }

    pub fn args(&self) -> Arguments<'_> {
        Arguments(&self.arguments)
    }
}

/// Typed read access to a call's argument bag
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a>(&'a Map<String, Value>);

impl<'a> Arguments<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self(map)
    }

    /// String argument, `None` when absent, null or not a string
    pub fn string(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// String argument that is present and not the empty string
    pub fn non_empty(&self, key: &str) -> Option<&'a str> {
        self.string(key).filter(|v| !v.is_empty())
    }

    /// First non-empty value among aliased keys
    pub fn first_non_empty(&self, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| self.non_empty(key))
    }

    /// Integer argument. Floats with no fractional part are accepted.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }
}

/// Outcome of one method call
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error {
        code: ErrorCode,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success(_))
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            MethodResponse::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn into_envelope(self, method: &str) -> ResponseEnvelope {
        match self {
            MethodResponse::Success(result) => ResponseEnvelope::Success { result },
            MethodResponse::Error {
                code,
                message,
                details,
            } => ResponseEnvelope::Error {
                code,
                message,
                details,
            },
            MethodResponse::NotImplemented => ResponseEnvelope::NotImplemented {
                method: method.to_string(),
            },
        }
    }
}

/// Wire form of a `MethodResponse`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseEnvelope {
    Success {
        result: Value,
    },
    Error {
        code: ErrorCode,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented {
        method: String,
    },
}
