//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the wire payload shapes for the idea board REST API and OpenAPI
//! schema generation. Wire fields are camelCase; enum-valued request fields
//! arrive as plain strings and are parsed by handlers so malformed values map
//! to validation errors instead of framework rejections.
use crate::model::{InterestSignal, Notification, OpenOpportunity, Role, User};
use crate::store::{IdeaRecord, InboxEntry, InterestRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// User payload with the password hash and soft-delete marker stripped.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl SafeUser {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            affiliation: user.affiliation.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub affiliation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: SafeUser,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: SafeUser,
}

/// The caller as resolved from the session token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeasQuery {
    pub category: Option<String>,
    pub stage: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IdeaCreateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub stage: Option<String>,
    pub contact_email: Option<String>,
    pub tags: Option<Vec<String>>,
    pub open_opportunities: Option<Vec<OpenOpportunity>>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IdeaUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub stage: Option<String>,
    pub contact_email: Option<String>,
    pub tags: Option<Vec<String>>,
    pub open_opportunities: Option<Vec<OpenOpportunity>>,
}

/// Idea as it appears in listings and mutation responses.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub category: String,
    pub stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author_name: String,
    pub author_role: Role,
    pub tags: Vec<String>,
    pub interest_count: u64,
    pub open_opportunities: Vec<OpenOpportunity>,
}

impl IdeaSummary {
    pub fn of(record: &IdeaRecord) -> Self {
        Self {
            id: record.idea.id.clone(),
            title: record.idea.title.clone(),
            description: record.idea.description.clone(),
            short_description: record.idea.short_description.clone(),
            category: record.idea.category.as_str().to_string(),
            stage: record.idea.stage.as_str().to_string(),
            contact_email: record.idea.contact_email.clone(),
            published_at: record.idea.created_at,
            author_name: record.author.name.clone(),
            author_role: record.author.role,
            tags: record.idea.tags.clone(),
            interest_count: record.interest_count,
            open_opportunities: record.idea.open_opportunities.clone(),
        }
    }
}

/// A user who expressed active interest, as embedded in the idea detail view.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterestedPerson {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub interest_type_for_idea: String,
}

/// Idea detail view: the summary plus author identity and active interest.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDetail {
    #[serde(flatten)]
    pub summary: IdeaSummary,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
    pub interested_person_ids: Vec<String>,
    pub interested_people: Vec<InterestedPerson>,
}

impl IdeaDetail {
    pub fn of(record: &IdeaRecord, interests: &[InterestRecord]) -> Self {
        Self {
            summary: IdeaSummary::of(record),
            author_id: record.author.id.clone(),
            author_avatar_url: record.author.avatar_url.clone(),
            interested_person_ids: interests
                .iter()
                .map(|interest| interest.signal.user_id.clone())
                .collect(),
            interested_people: interests
                .iter()
                .map(|interest| InterestedPerson {
                    id: interest.user.id.clone(),
                    name: interest.user.name.clone(),
                    role: interest.user.role,
                    avatar_url: interest.user.avatar_url.clone(),
                    interest_type_for_idea: interest.signal.interest_type.as_str().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterestCreateRequest {
    pub idea_id: Option<String>,
    pub interest_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestResponse {
    pub id: String,
    pub idea_id: String,
    pub person_id: String,
    pub interest_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InterestResponse {
    pub fn of(signal: &InterestSignal) -> Self {
        Self {
            id: signal.id.clone(),
            idea_id: signal.idea_id.clone(),
            person_id: signal.user_id.clone(),
            interest_type: signal.interest_type.as_str().to_string(),
            message: signal.message.clone(),
            created_at: signal.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestsQuery {
    pub idea_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestListItem {
    pub id: String,
    pub idea_id: String,
    pub idea_title: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_avatar_url: Option<String>,
    pub interest_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InterestListItem {
    pub fn of(record: &InterestRecord) -> Self {
        Self {
            id: record.signal.id.clone(),
            idea_id: record.signal.idea_id.clone(),
            idea_title: record.idea_title.clone(),
            user_id: record.user.id.clone(),
            user_name: record.user.name.clone(),
            user_role: record.user.role,
            user_avatar_url: record.user.avatar_url.clone(),
            interest_type: record.signal.interest_type.as_str().to_string(),
            message: record.signal.message.clone(),
            created_at: record.signal.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawInterestQuery {
    pub idea_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationsQuery {
    pub read: Option<bool>,
}

/// Inbox item: the notification plus its resolved interest context.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboxItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub idea_id: Option<String>,
    pub idea_title: Option<String>,
    pub requester_id: Option<String>,
    pub requester_name: Option<String>,
    pub requester_role: Option<Role>,
    pub requester_avatar_url: Option<String>,
    pub interest_message: Option<String>,
}

impl InboxItem {
    pub fn of(entry: &InboxEntry) -> Self {
        let notification: &Notification = &entry.notification;
        Self {
            id: notification.id.clone(),
            kind: notification.kind.as_str().to_string(),
            entity_type: notification.entity_type.clone(),
            entity_id: notification.entity_id.clone(),
            message: notification.message.clone(),
            read: notification.read,
            created_at: notification.created_at,
            idea_id: entry.idea_id.clone(),
            idea_title: entry.idea_title.clone(),
            requester_id: entry.requester.as_ref().map(|user| user.id.clone()),
            requester_name: entry.requester.as_ref().map(|user| user.name.clone()),
            requester_role: entry.requester.as_ref().map(|user| user.role),
            requester_avatar_url: entry
                .requester
                .as_ref()
                .and_then(|user| user.avatar_url.clone()),
            interest_message: entry.interest_message.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct NotificationPatchRequest {
    pub id: Option<String>,
    pub read: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationPatchResponse {
    pub id: String,
    pub read: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationDeleteQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UsersQuery {
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
}
