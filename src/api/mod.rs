pub mod channel;
pub mod lifecycle;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::bridge::PaymentBridge;

/// Routes for the method channel, plugin lifecycle and health
pub fn router(bridge: Arc<PaymentBridge>) -> Router {
    Router::new()
        .route("/channel/{name}", post(channel::handle_method_call))
        .route(
            "/lifecycle/activity",
            put(lifecycle::attach_activity).delete(lifecycle::detach_activity),
        )
        .route("/lifecycle/detach", post(lifecycle::detach_from_engine))
        .route("/health", get(lifecycle::health))
        .with_state(bridge)
}
