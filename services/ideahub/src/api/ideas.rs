//! Idea CRUD handlers.
//!
//! # Purpose
//! Implements listing with filters and derived-interest sorting, public
//! reads, and ownership/moderation-gated mutations with soft deletes.
use crate::api::error::{
    api_forbidden, api_internal, api_not_found, api_validation_error, ApiError,
};
use crate::api::fetch_idea;
use crate::api::types::{
    IdeaCreateRequest, IdeaDetail, IdeaSummary, IdeaUpdateRequest, IdeasQuery, SuccessResponse,
};
use crate::app::AppState;
use crate::auth::rbac;
use crate::auth::session::require_session;
use crate::model::{Idea, IdeaCategory, IdeaStage, IdeaStatus};
use crate::store::{IdeaFilter, IdeaPatch, IdeaRecord, IdeaSort, StoreError, UserRef};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

fn parse_filter(query: IdeasQuery) -> Result<IdeaFilter, ApiError> {
    let category = query
        .category
        .map(|raw| IdeaCategory::parse(&raw).ok_or_else(|| api_validation_error("unknown category")))
        .transpose()?;
    let stage = query
        .stage
        .map(|raw| IdeaStage::parse(&raw).ok_or_else(|| api_validation_error("unknown stage")))
        .transpose()?;
    // Anything other than mostInterest falls back to newest-first.
    let sort = match query.sort_by.as_deref() {
        Some("mostInterest") => IdeaSort::MostInterest,
        _ => IdeaSort::Newest,
    };
    Ok(IdeaFilter {
        category,
        stage,
        search: query.search,
        sort,
    })
}

#[utoipa::path(
    get,
    path = "/api/ideas",
    tag = "ideas",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("stage" = Option<String>, Query, description = "Filter by stage"),
        ("search" = Option<String>, Query, description = "Title/description substring"),
        ("sortBy" = Option<String>, Query, description = "mostInterest or newest")
    ),
    responses(
        (status = 200, description = "Published ideas", body = [IdeaSummary])
    )
)]
pub(crate) async fn list_ideas(
    Query(query): Query<IdeasQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<IdeaSummary>>, ApiError> {
    let filter = parse_filter(query)?;
    let records = state
        .store
        .list_ideas(&filter)
        .await
        .map_err(|err| api_internal("failed to list ideas", &err))?;
    Ok(Json(records.iter().map(IdeaSummary::of).collect()))
}

#[utoipa::path(
    post,
    path = "/api/ideas",
    tag = "ideas",
    request_body = IdeaCreateRequest,
    responses(
        (status = 201, description = "Idea created", body = IdeaSummary),
        (status = 401, description = "No session", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Role may not create ideas", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_idea(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<IdeaCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = require_session(&state, &headers)?;
    if !rbac::can(session.role, rbac::Permission::IdeasCreate) {
        return Err(api_forbidden("role may not create ideas"));
    }

    let (Some(title), Some(description), Some(category), Some(stage)) =
        (body.title, body.description, body.category, body.stage)
    else {
        return Err(api_validation_error("missing required fields"));
    };
    let category =
        IdeaCategory::parse(&category).ok_or_else(|| api_validation_error("unknown category"))?;
    let stage = IdeaStage::parse(&stage).ok_or_else(|| api_validation_error("unknown stage"))?;

    let idea = Idea {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        short_description: body.short_description,
        category,
        stage,
        contact_email: body.contact_email,
        status: IdeaStatus::Published,
        user_id: session.id.clone(),
        tags: body.tags.unwrap_or_default(),
        open_opportunities: body.open_opportunities.unwrap_or_default(),
        created_at: Utc::now(),
        deleted_at: None,
    };

    let idea = state
        .store
        .create_idea(idea)
        .await
        .map_err(|err| api_internal("failed to create idea", &err))?;

    // A brand-new idea has no signals yet; the author comes from the session.
    let record = IdeaRecord {
        idea,
        author: UserRef {
            id: session.id,
            name: session.name,
            role: session.role,
            avatar_url: None,
        },
        interest_count: 0,
    };
    Ok((StatusCode::CREATED, Json(IdeaSummary::of(&record))))
}

#[utoipa::path(
    get,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "Idea identifier")),
    responses(
        (status = 200, description = "Idea detail", body = IdeaDetail),
        (status = 404, description = "Idea absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_idea(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdeaDetail>, ApiError> {
    let record = match state.store.get_idea_record(&idea_id).await {
        Ok(record) => record,
        Err(StoreError::NotFound(_)) => return Err(api_not_found("idea not found")),
        Err(err) => return Err(api_internal("failed to load idea", &err)),
    };
    let interests = state
        .store
        .list_interests(Some(&idea_id), None)
        .await
        .map_err(|err| api_internal("failed to load idea interest", &err))?;
    Ok(Json(IdeaDetail::of(&record, &interests)))
}

#[utoipa::path(
    put,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "Idea identifier")),
    request_body = IdeaUpdateRequest,
    responses(
        (status = 200, description = "Idea updated", body = IdeaSummary),
        (status = 403, description = "Not owner or moderator", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Idea absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_idea(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<IdeaUpdateRequest>,
) -> Result<Json<IdeaSummary>, ApiError> {
    let session = require_session(&state, &headers)?;
    let idea = fetch_idea(&state, &idea_id).await?;

    // Ownership is a property of the idea, so existence resolves first.
    let can_update =
        idea.user_id == session.id || rbac::can(session.role, rbac::Permission::IdeasModerate);
    if !can_update {
        return Err(api_forbidden("not allowed to update this idea"));
    }

    let category = body
        .category
        .map(|raw| IdeaCategory::parse(&raw).ok_or_else(|| api_validation_error("unknown category")))
        .transpose()?;
    let stage = body
        .stage
        .map(|raw| IdeaStage::parse(&raw).ok_or_else(|| api_validation_error("unknown stage")))
        .transpose()?;

    let patch = IdeaPatch {
        title: body.title,
        description: body.description,
        short_description: body.short_description,
        category,
        stage,
        contact_email: body.contact_email,
        tags: body.tags,
        open_opportunities: body.open_opportunities,
    };

    match state.store.update_idea(&idea_id, patch).await {
        Ok(_) => {}
        Err(StoreError::NotFound(_)) => return Err(api_not_found("idea not found")),
        Err(err) => return Err(api_internal("failed to update idea", &err)),
    }

    let record = state
        .store
        .get_idea_record(&idea_id)
        .await
        .map_err(|err| api_internal("failed to load updated idea", &err))?;
    Ok(Json(IdeaSummary::of(&record)))
}

#[utoipa::path(
    delete,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "Idea identifier")),
    responses(
        (status = 200, description = "Idea soft-deleted", body = SuccessResponse),
        (status = 403, description = "Not owner or admin", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Idea absent or deleted", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_idea(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let idea = fetch_idea(&state, &idea_id).await?;

    let can_delete =
        idea.user_id == session.id || rbac::can(session.role, rbac::Permission::IdeasDelete);
    if !can_delete {
        return Err(api_forbidden("not allowed to delete this idea"));
    }

    match state.store.delete_idea(&idea_id).await {
        Ok(()) => Ok(Json(SuccessResponse::ok())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("idea not found")),
        Err(err) => Err(api_internal("failed to delete idea", &err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parses_most_interest_only() {
        let filter = parse_filter(IdeasQuery {
            category: None,
            stage: None,
            search: None,
            sort_by: Some("mostInterest".to_string()),
        })
        .expect("filter");
        assert_eq!(filter.sort, IdeaSort::MostInterest);

        let filter = parse_filter(IdeasQuery {
            category: None,
            stage: None,
            search: None,
            sort_by: Some("oldest".to_string()),
        })
        .expect("filter");
        assert_eq!(filter.sort, IdeaSort::Newest);
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let err = parse_filter(IdeasQuery {
            category: Some("Gardening".to_string()),
            stage: None,
            search: None,
            sort_by: None,
        })
        .expect_err("validation");
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
