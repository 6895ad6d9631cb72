//! Registration, login, and session introspection handlers.
//!
//! # Purpose
//! Implements the credentials flow: account creation with an adaptive
//! password hash, login that mints a session token, and a `me` endpoint that
//! echoes the resolved session.
use crate::api::error::{
    api_conflict, api_internal, api_internal_message, api_unauthorized, api_validation_error,
    ApiError,
};
use crate::api::types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SafeUser, SessionResponse,
};
use crate::app::AppState;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::require_session;
use crate::model::{Role, User};
use crate::store::StoreError;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or email taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(name), Some(email), Some(password), Some(role)) =
        (body.name, body.email, body.password, body.role)
    else {
        return Err(api_validation_error("missing required fields"));
    };
    let role = Role::parse(&role).ok_or_else(|| api_validation_error("unknown role"))?;
    if password.len() < 6 {
        return Err(api_validation_error(
            "password must be at least 6 characters",
        ));
    }

    let password_hash = hash_password(&password).map_err(|err| {
        tracing::error!(error = ?err, "failed to hash password");
        api_internal_message("failed to create account")
    })?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        name,
        role,
        affiliation: body.affiliation,
        bio: None,
        avatar_url: None,
        email_verified: false,
        last_login_at: None,
        created_at: Utc::now(),
        deleted_at: None,
    };

    match state.store.create_user(user).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                user: SafeUser::of(&user),
            }),
        )),
        Err(StoreError::Conflict(_)) => Err(api_conflict("email already in use")),
        Err(err) => Err(api_internal("failed to create account", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(api_validation_error("missing email or password"));
    };

    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(|err| api_internal("failed to load account", &err))?
        .ok_or_else(|| api_unauthorized("invalid credentials"))?;

    if !verify_password(&password, &user.password_hash) {
        return Err(api_unauthorized("invalid credentials"));
    }

    if let Err(err) = state.store.record_login(&user.id, Utc::now()).await {
        // Login bookkeeping is best effort; the session is still issued.
        tracing::warn!(error = ?err, "failed to record login time");
    }

    let token = state
        .sessions
        .issue(&user.id, &user.name, user.role)
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to issue session token");
            api_internal_message("failed to issue session")
        })?;

    Ok(Json(LoginResponse {
        token,
        user: SafeUser::of(&user),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No valid session", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    Ok(Json(SessionResponse {
        id: session.id,
        name: session.name,
        role: session.role,
    }))
}
