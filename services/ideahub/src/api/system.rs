//! Health API handler.
//!
//! # Purpose and responsibility
//! Provides a lightweight endpoint for probes and automation to validate
//! service health.
//!
//! # Key invariants and assumptions
//! - Health checks must be fast and side-effect free.
use crate::api::error::{api_internal, ApiError};
use crate::api::types::HealthStatus;
use crate::app::AppState;
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
/// Return service health status.
///
/// Probes the backing store and returns `ok` if healthy.
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    state
        .store
        .health_check()
        .await
        .map_err(|err| api_internal("store unhealthy", &err))?;
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
