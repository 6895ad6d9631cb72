//! Idea board HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::session::SessionKeys;
use crate::config::SeedConfig;
use crate::store::IdeaBoardStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdeaBoardStore + Send + Sync>,
    pub sessions: Arc<SessionKeys>,
    pub seed: Arc<SeedConfig>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(api::system::health))
        .route("/api/auth/register", axum::routing::post(api::auth::register))
        .route("/api/auth/login", axum::routing::post(api::auth::login))
        .route("/api/auth/me", axum::routing::get(api::auth::me))
        .route(
            "/api/ideas",
            axum::routing::get(api::ideas::list_ideas).post(api::ideas::create_idea),
        )
        .route(
            "/api/ideas/:id",
            axum::routing::get(api::ideas::get_idea)
                .put(api::ideas::update_idea)
                .delete(api::ideas::delete_idea),
        )
        .route(
            "/api/interests",
            axum::routing::get(api::interests::list_interests)
                .post(api::interests::create_interest)
                .delete(api::interests::withdraw_interest),
        )
        .route(
            "/api/notifications",
            axum::routing::get(api::notifications::list_notifications)
                .patch(api::notifications::patch_notification)
                .delete(api::notifications::delete_notification),
        )
        .route(
            "/api/users",
            axum::routing::get(api::users::list_users),
        )
        .route(
            "/api/users/:id",
            axum::routing::get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route("/api/admin/seed", axum::routing::post(api::admin::seed))
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
