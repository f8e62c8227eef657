use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::bridge::PaymentBridge;
use crate::health::{check_health, HealthStatus};
use crate::payments::types::ActivityHandle;

#[derive(Debug, Default, Deserialize)]
pub struct AttachActivityRequest {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
}

/// PUT /lifecycle/activity
pub async fn attach_activity(
    State(bridge): State<Arc<PaymentBridge>>,
    Json(payload): Json<AttachActivityRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id = match payload.id {
        Some(id) if id.trim().is_empty() => {
            return Err((
                StatusCode::BAD_REQUEST,
                "activity id cannot be blank".to_string(),
            ))
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };
    bridge.attach_activity(ActivityHandle::new(id)).await;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /lifecycle/activity
pub async fn detach_activity(State(bridge): State<Arc<PaymentBridge>>) -> StatusCode {
    bridge.detach_activity().await;
    StatusCode::NO_CONTENT
}

/// POST /lifecycle/detach
pub async fn detach_from_engine(State(bridge): State<Arc<PaymentBridge>>) -> StatusCode {
    bridge.detach_from_engine().await;
    StatusCode::NO_CONTENT
}

/// GET /health
pub async fn health(State(bridge): State<Arc<PaymentBridge>>) -> Json<HealthStatus> {
    Json(check_health(&bridge).await)
}
