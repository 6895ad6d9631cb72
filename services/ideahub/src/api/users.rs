//! User directory and account handlers.
//!
//! # Purpose
//! Implements the people directory, safe profile reads, profile edits, and
//! the account delete that cascades to owned ideas.
use crate::api::error::{
    api_forbidden, api_internal, api_not_found, api_validation_error, ApiError,
};
use crate::api::types::{SafeUser, SuccessResponse, UserUpdateRequest, UsersQuery};
use crate::app::AppState;
use crate::auth::rbac;
use crate::auth::session::require_session;
use crate::model::Role;
use crate::store::{StoreError, UserFilter, UserPatch};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("search" = Option<String>, Query, description = "Name/email substring")
    ),
    responses(
        (status = 200, description = "Active users", body = [SafeUser]),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Role may not list users", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    Query(query): Query<UsersQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SafeUser>>, ApiError> {
    let session = require_session(&state, &headers)?;
    if !rbac::can(session.role, rbac::Permission::UsersRead) {
        return Err(api_forbidden("role may not list users"));
    }

    let role = query
        .role
        .map(|raw| Role::parse(&raw).ok_or_else(|| api_validation_error("unknown role")))
        .transpose()?;
    let users = state
        .store
        .list_users(&UserFilter {
            role,
            search: query.search,
        })
        .await
        .map_err(|err| api_internal("failed to list users", &err))?;
    Ok(Json(users.iter().map(SafeUser::of).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Safe user profile", body = SafeUser),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SafeUser>, ApiError> {
    require_session(&state, &headers)?;
    match state.store.get_user(&user_id).await {
        Ok(user) => Ok(Json(SafeUser::of(&user))),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to load user", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = SafeUser),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not self and no users:update", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UserUpdateRequest>,
) -> Result<Json<SafeUser>, ApiError> {
    let session = require_session(&state, &headers)?;
    let allowed = session.id == user_id || rbac::can(session.role, rbac::Permission::UsersUpdate);
    if !allowed {
        return Err(api_forbidden("not allowed to update this user"));
    }

    let patch = UserPatch {
        name: body.name,
        affiliation: body.affiliation,
        bio: body.bio,
        avatar_url: body.avatar_url,
    };
    match state.store.update_user(&user_id, patch).await {
        Ok(user) => Ok(Json(SafeUser::of(&user))),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to update user", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Account and owned ideas soft-deleted", body = SuccessResponse),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not self and no users:delete", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let allowed = session.id == user_id || rbac::can(session.role, rbac::Permission::UsersDelete);
    if !allowed {
        return Err(api_forbidden("not allowed to delete this user"));
    }

    // The store applies the user and idea soft-deletes as one atomic unit.
    match state.store.delete_user_cascade(&user_id).await {
        Ok(()) => Ok(Json(SuccessResponse::ok())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to delete user", &err)),
    }
}
