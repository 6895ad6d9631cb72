//! Notification inbox handlers.
//!
//! # Purpose
//! Serves the polling inbox: list with the interest-signal join resolved at
//! read time, mark-read, and delete. Every mutation is scoped to the owning
//! recipient.
use crate::api::error::{
    api_forbidden, api_internal, api_validation_error, ApiError,
};
use crate::api::fetch_notification;
use crate::api::types::{
    InboxItem, NotificationDeleteQuery, NotificationPatchRequest, NotificationPatchResponse,
    NotificationsQuery, SuccessResponse,
};
use crate::app::AppState;
use crate::auth::session::require_session;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    params(("read" = Option<bool>, Query, description = "Filter by read state")),
    responses(
        (status = 200, description = "Inbox items", body = [InboxItem]),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_notifications(
    Query(query): Query<NotificationsQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InboxItem>>, ApiError> {
    let session = require_session(&state, &headers)?;
    let entries = state
        .store
        .list_inbox(&session.id, query.read)
        .await
        .map_err(|err| api_internal("failed to list notifications", &err))?;
    Ok(Json(entries.iter().map(InboxItem::of).collect()))
}

#[utoipa::path(
    patch,
    path = "/api/notifications",
    tag = "notifications",
    request_body = NotificationPatchRequest,
    responses(
        (status = 200, description = "Read state updated", body = NotificationPatchResponse),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not the recipient", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Notification not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NotificationPatchRequest>,
) -> Result<Json<NotificationPatchResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let notification_id = body
        .id
        .ok_or_else(|| api_validation_error("notification id is required"))?;

    let notification = fetch_notification(&state, &notification_id).await?;
    if notification.user_id != session.id {
        return Err(api_forbidden("not allowed to update this notification"));
    }

    // Omitting `read` leaves the flag as it is.
    let read = body.read.unwrap_or(notification.read);
    let updated = state
        .store
        .set_notification_read(&notification_id, read)
        .await
        .map_err(|err| api_internal("failed to update notification", &err))?;
    Ok(Json(NotificationPatchResponse {
        id: updated.id,
        read: updated.read,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/notifications",
    tag = "notifications",
    params(("id" = String, Query, description = "Notification identifier")),
    responses(
        (status = 200, description = "Notification deleted", body = SuccessResponse),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not the recipient", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Notification not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_notification(
    Query(query): Query<NotificationDeleteQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let notification_id = query
        .id
        .ok_or_else(|| api_validation_error("notification id is required"))?;

    let notification = fetch_notification(&state, &notification_id).await?;
    if notification.user_id != session.id {
        return Err(api_forbidden("not allowed to delete this notification"));
    }

    state
        .store
        .delete_notification(&notification_id)
        .await
        .map_err(|err| api_internal("failed to delete notification", &err))?;
    Ok(Json(SuccessResponse::ok()))
}
