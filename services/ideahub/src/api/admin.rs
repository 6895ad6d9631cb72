//! Admin bootstrap endpoint.
//!
//! # Purpose
//! Provides a bearer-guarded seed endpoint that provisions the configured
//! admin account. Idempotent: repeated calls leave an existing account
//! untouched.
use crate::api::error::{api_internal, api_internal_message, api_unauthorized, ApiError};
use crate::api::types::SeedResponse;
use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::model::{Role, User};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

#[utoipa::path(
    post,
    path = "/api/admin/seed",
    tag = "admin",
    responses(
        (status = 200, description = "Admin account ensured", body = SeedResponse),
        (status = 401, description = "Bad or missing seed token", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn seed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SeedResponse>, ApiError> {
    if bearer_token(&headers) != Some(state.seed.secret.as_str()) {
        return Err(api_unauthorized("invalid seed token"));
    }

    let password_hash = hash_password(&state.seed.admin_password).map_err(|err| {
        tracing::error!(error = ?err, "failed to hash admin password");
        api_internal_message("failed to seed admin account")
    })?;

    let admin = User {
        id: Uuid::new_v4().to_string(),
        email: state.seed.admin_email.clone(),
        password_hash,
        name: state.seed.admin_name.clone(),
        role: Role::Admin,
        affiliation: Some(state.seed.admin_affiliation.clone()),
        bio: None,
        avatar_url: None,
        email_verified: true,
        last_login_at: None,
        created_at: Utc::now(),
        deleted_at: None,
    };

    let admin = state
        .store
        .upsert_admin(admin)
        .await
        .map_err(|err| api_internal("failed to seed admin account", &err))?;
    tracing::info!(email = %admin.email, "admin account ensured");

    Ok(Json(SeedResponse {
        success: true,
        message: "database seeded".to_string(),
    }))
}
