pub mod paystack;

pub use paystack::{HttpPaystackSdk, PaystackConfig};
