use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bridge::PaymentBridge;
use crate::channel::{MethodCall, MethodResponse, CHANNEL_NAME};
use crate::error::ErrorCategory;

/// POST /channel/{name}
///
/// Body is a method call, response is the serialized `ResponseEnvelope`.
pub async fn handle_method_call(
    State(bridge): State<Arc<PaymentBridge>>,
    Path(name): Path<String>,
    Json(call): Json<MethodCall>,
) -> Response {
    if name != CHANNEL_NAME {
        warn!(channel = %name, "call on unknown channel");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown channel: {}", name) })),
        )
            .into_response();
    }

    debug!(method = %call.method, "method call received");
    let response = bridge.handle(&call).await;
    let status = status_for(&response);
    (status, Json(response.into_envelope(&call.method))).into_response()
}

fn status_for(response: &MethodResponse) -> StatusCode {
    match response {
        MethodResponse::Success(_) => StatusCode::OK,
        MethodResponse::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        MethodResponse::Error { code, .. } => match code.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Precondition => StatusCode::CONFLICT,
            ErrorCategory::Gateway => StatusCode::BAD_GATEWAY,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}
