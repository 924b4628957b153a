//! Health check endpoints for Easel
//!
//! This module implements health and readiness checks for orchestration
//! platforms. Readiness reports on the event store and the transform
//! registry; a registry with identity fallbacks is degraded, not unhealthy.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::collections::HashMap;

use crate::api::{AppState, ComponentHealth, HealthResponse, HealthStatus, ReadyResponse, BUILD_INFO};
use crate::store::EventLogStore;
use crate::transform::TransformRegistry;

/// Basic liveness check endpoint
///
/// Returns 200 OK if the service is alive.
/// This endpoint should be lightweight and not check external dependencies.
///
/// # Example
/// ```text
/// GET /healthz
/// ```
pub async fn health_check() -> Response {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Service is running".to_string()),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Readiness check endpoint
///
/// Reports per-component status. The store is in-memory and always ready;
/// the transform component degrades when enabled names run as identity
/// fallbacks.
///
/// # Example
/// ```text
/// GET /readyz
/// ```
pub async fn ready_check(State(state): State<AppState>) -> Response {
    let mut checks = HashMap::new();
    checks.insert(
        "event_store".to_string(),
        event_store_health(&state.store).await,
    );
    checks.insert(
        "transforms".to_string(),
        transform_health(&state.transforms),
    );

    let overall_status = overall_status(&checks);

    let response = ReadyResponse {
        status: overall_status,
        checks,
        timestamp: Utc::now(),
    };

    let status_code = overall_status.to_status_code();
    (status_code, Json(response)).into_response()
}

/// Build information endpoint
///
/// # Example
/// ```text
/// GET /build
/// ```
pub async fn build_info() -> Response {
    (StatusCode::OK, Json(&BUILD_INFO)).into_response()
}

/// Report on the event store
async fn event_store_health(store: &EventLogStore) -> ComponentHealth {
    let rooms = store.room_count().await;
    let events = store.event_count().await;

    ComponentHealth {
        status: HealthStatus::Healthy,
        message: Some(format!("{} commands across {} active rooms", events, rooms)),
        last_check: Utc::now(),
    }
}

/// Report on the transform registry
fn transform_health(registry: &TransformRegistry) -> ComponentHealth {
    let fallback = registry.fallback_names();

    if fallback.is_empty() {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some(format!("{} transforms loaded", registry.len())),
            last_check: Utc::now(),
        }
    } else {
        ComponentHealth {
            status: HealthStatus::Degraded,
            message: Some(format!("Identity fallback for: {}", fallback.join(", "))),
            last_check: Utc::now(),
        }
    }
}

/// Fold component checks into an overall status
fn overall_status(checks: &HashMap<String, ComponentHealth>) -> HealthStatus {
    if checks.values().any(|c| c.status == HealthStatus::Unhealthy) {
        return HealthStatus::Unhealthy;
    }

    if checks.values().any(|c| c.status == HealthStatus::Degraded) {
        return HealthStatus::Degraded;
    }

    HealthStatus::Healthy
}
