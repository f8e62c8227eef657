//! Payment bridge between an application layer and the Paystack gateway.
//!
//! A named method call with an argument bag goes in; a success value, an error
//! triple or a not-implemented signal comes out. Payments run either against a
//! simulated backend or through the Paystack SDK contract.

#[cfg(feature = "server")]
pub mod api;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod payments;

pub use bridge::PaymentBridge;
pub use channel::{MethodCall, MethodResponse};
pub use error::{BridgeError, ErrorCode};
