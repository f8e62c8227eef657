//! Health check module
//! Reports the bridge's backend and whether it is ready to take payments

use serde::Serialize;
use std::collections::HashMap;

use crate::bridge::PaymentBridge;
use crate::payments::backend::BackendKind;

/// Health status response
#[derive(Debug, Serialize, Clone)]
pub struct HealthStatus {
    pub status: HealthState,
    pub backend: BackendKind,
    pub checks: HashMap<String, ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Overall health state
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Individual component health status
#[derive(Debug, Serialize, Clone)]
pub struct ComponentHealth {
    pub status: ComponentState,
    pub details: Option<String>,
}

/// Component state
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum ComponentState {
    Up,
    Warning,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthState::Healthy)
    }
}

impl ComponentHealth {
    pub fn up(details: Option<String>) -> Self {
        Self {
            status: ComponentState::Up,
            details,
        }
    }

    pub fn warning(details: Option<String>) -> Self {
        Self {
            status: ComponentState::Warning,
            details,
        }
    }
}

/// Snapshot the bridge state. Missing configuration or activity degrades the
/// status but never makes the process unhealthy.
pub async fn check_health(bridge: &PaymentBridge) -> HealthStatus {
    let mut checks = HashMap::new();
    let mut degraded = false;

    match bridge.config().await {
        Some(config) => {
            checks.insert(
                "configuration".to_string(),
                ComponentHealth::up(Some(format!(
                    "{} {} ({})",
                    config.country, config.currency, config.environment
                ))),
            );
        }
        None => {
            degraded = true;
            checks.insert(
                "configuration".to_string(),
                ComponentHealth::warning(Some("initialize has not been called".to_string())),
            );
        }
    }

    let activity = bridge.activity().await;
    if bridge.backend_kind() == BackendKind::Paystack && activity.is_none() {
        degraded = true;
        checks.insert(
            "activity".to_string(),
            ComponentHealth::warning(Some("no foreground activity attached".to_string())),
        );
    } else {
        checks.insert(
            "activity".to_string(),
            ComponentHealth::up(
                activity.map(|a| format!("{} since {}", a.id, a.attached_at.to_rfc3339())),
            ),
        );
    }

    HealthStatus {
        status: if degraded {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        },
        backend: bridge.backend_kind(),
        checks,
        timestamp: chrono::Utc::now(),
    }
}
