//! OpenAPI schema aggregation for the idea board API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    admin, auth, ideas, interests, notifications, system,
    types::{
        ErrorResponse, HealthStatus, IdeaCreateRequest, IdeaDetail, IdeaSummary,
        IdeaUpdateRequest, InboxItem, InterestCreateRequest, InterestListItem, InterestResponse,
        InterestedPerson, LoginRequest, LoginResponse, NotificationPatchRequest,
        NotificationPatchResponse, RegisterRequest, RegisterResponse, SafeUser, SeedResponse,
        SessionResponse, SuccessResponse, UserUpdateRequest,
    },
    users,
};
use crate::model::{
    Idea, IdeaCategory, IdeaStage, IdeaStatus, InterestSignal, InterestStatus, InterestType,
    Notification, NotificationKind, OpenOpportunity, Role, User,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ideahub",
        version = "v1",
        description = "University startup idea board HTTP API"
    ),
    paths(
        system::health,
        auth::register,
        auth::login,
        auth::me,
        ideas::list_ideas,
        ideas::create_idea,
        ideas::get_idea,
        ideas::update_idea,
        ideas::delete_idea,
        interests::create_interest,
        interests::list_interests,
        interests::withdraw_interest,
        notifications::list_notifications,
        notifications::patch_notification,
        notifications::delete_notification,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        admin::seed
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        SuccessResponse,
        SafeUser,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        SessionResponse,
        IdeaCreateRequest,
        IdeaUpdateRequest,
        IdeaSummary,
        IdeaDetail,
        InterestedPerson,
        InterestCreateRequest,
        InterestResponse,
        InterestListItem,
        InboxItem,
        NotificationPatchRequest,
        NotificationPatchResponse,
        UserUpdateRequest,
        SeedResponse,
        User,
        Role,
        Idea,
        IdeaCategory,
        IdeaStage,
        IdeaStatus,
        OpenOpportunity,
        InterestSignal,
        InterestType,
        InterestStatus,
        Notification,
        NotificationKind
    ))
)]
pub struct ApiDoc;
