//! Interest signal workflow handlers.
//!
//! # Purpose
//! Implements the create/withdraw state machine for interest signals and the
//! notification fan-out for high-engagement interest kinds.
//!
//! # Key invariants and assumptions
//! - The one-active-signal-per-(idea, user) rule is enforced by the store's
//!   transactional upsert; this module never does a check-then-insert.
//! - Exactly one notification is written per Collaborate/Fund signal whose
//!   requester is not the idea owner; Explore/Mentor and self-signals write
//!   none. Withdrawal never removes a notification already sent.
use crate::api::error::{
    api_conflict, api_forbidden, api_internal, api_not_found, api_validation_error, ApiError,
};
use crate::api::fetch_idea;
use crate::api::types::{
    InterestCreateRequest, InterestListItem, InterestResponse, InterestsQuery, SuccessResponse,
    WithdrawInterestQuery,
};
use crate::app::AppState;
use crate::auth::rbac;
use crate::auth::session::require_session;
use crate::model::{
    InterestSignal, InterestStatus, InterestType, Notification, NotificationKind,
    ENTITY_INTEREST_SIGNAL,
};
use crate::store::StoreError;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/interests",
    tag = "interests",
    request_body = InterestCreateRequest,
    responses(
        (status = 201, description = "Interest recorded", body = InterestResponse),
        (status = 400, description = "Invalid input or interest already expressed", body = crate::api::types::ErrorResponse),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Role may not express interest", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Idea absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_interest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<InterestCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = require_session(&state, &headers)?;
    if !rbac::can(session.role, rbac::Permission::InterestsCreate) {
        return Err(api_forbidden("role may not express interest"));
    }

    let (Some(idea_id), Some(interest_type)) = (body.idea_id, body.interest_type) else {
        return Err(api_validation_error("missing required fields"));
    };
    let interest_type = InterestType::parse(&interest_type)
        .ok_or_else(|| api_validation_error("unknown interest type"))?;

    let idea = fetch_idea(&state, &idea_id).await?;

    let signal = InterestSignal {
        id: Uuid::new_v4().to_string(),
        idea_id: idea.id.clone(),
        user_id: session.id.clone(),
        interest_type,
        message: body.message,
        status: InterestStatus::Active,
        created_at: Utc::now(),
    };

    let signal = match state.store.upsert_interest(signal).await {
        Ok(signal) => signal,
        Err(StoreError::Conflict(_)) => {
            return Err(api_conflict("already expressed interest in this idea"))
        }
        Err(err) => return Err(api_internal("failed to record interest", &err)),
    };

    if interest_type.notifies_owner() && idea.user_id != session.id {
        let (kind, action) = match interest_type {
            InterestType::Collaborate => (NotificationKind::Collaboration, "collaborate on"),
            _ => (NotificationKind::Funding, "fund"),
        };
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: idea.user_id.clone(),
            kind,
            entity_type: ENTITY_INTEREST_SIGNAL.to_string(),
            entity_id: Some(signal.id.clone()),
            message: format!(
                "{} wants to {} your idea \"{}\"",
                session.name, action, idea.title
            ),
            read: false,
            created_at: Utc::now(),
        };
        state
            .store
            .create_notification(notification)
            .await
            .map_err(|err| api_internal("failed to notify idea owner", &err))?;
    }

    Ok((StatusCode::CREATED, Json(InterestResponse::of(&signal))))
}

#[utoipa::path(
    get,
    path = "/api/interests",
    tag = "interests",
    params(
        ("ideaId" = Option<String>, Query, description = "Narrow to one idea"),
        ("userId" = Option<String>, Query, description = "Narrow to one user")
    ),
    responses(
        (status = 200, description = "Active interest signals", body = [InterestListItem]),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_interests(
    Query(query): Query<InterestsQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InterestListItem>>, ApiError> {
    require_session(&state, &headers)?;
    let records = state
        .store
        .list_interests(query.idea_id.as_deref(), query.user_id.as_deref())
        .await
        .map_err(|err| api_internal("failed to list interest", &err))?;
    Ok(Json(records.iter().map(InterestListItem::of).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/interests",
    tag = "interests",
    params(("ideaId" = String, Query, description = "Idea to withdraw interest from")),
    responses(
        (status = 200, description = "Interest withdrawn", body = SuccessResponse),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 404, description = "No signal for this idea", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn withdraw_interest(
    Query(query): Query<WithdrawInterestQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let idea_id = query
        .idea_id
        .ok_or_else(|| api_validation_error("ideaId is required"))?;

    match state.store.withdraw_interest(&idea_id, &session.id).await {
        Ok(()) => Ok(Json(SuccessResponse::ok())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("interest not found")),
        Err(err) => Err(api_internal("failed to withdraw interest", &err)),
    }
}
