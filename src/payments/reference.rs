//! Timestamp-derived identifiers for references and placeholder access codes

use std::sync::atomic::{AtomicI64, Ordering};

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

pub const SIMULATED_PREFIX: &str = "sim";
pub const GATEWAY_PREFIX: &str = "ps";
pub const ACCESS_CODE_PREFIX: &str = "ac";

/// Current epoch millis, bumped so that no two calls in this process return the same value
fn next_millis() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let candidate = if now > last { now } else { last + 1 };
        match LAST_MILLIS.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// `<prefix>_<millis>`
pub fn generate(prefix: &str) -> String {
    format!("{}_{}", prefix, next_millis())
}
