//! Idea board HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and shared helpers for resolving entities
//! with uniform error mapping.
pub mod admin;
pub mod auth;
pub mod error;
pub mod ideas;
pub mod interests;
pub mod notifications;
pub mod openapi;
pub mod system;
pub mod types;
pub mod users;

use crate::api::error::{api_internal, api_not_found, ApiError};
use crate::app::AppState;
use crate::model::{Idea, Notification};
use crate::store::StoreError;

/// Load an idea that exists and is not soft-deleted, or fail with 404.
pub(crate) async fn fetch_idea(state: &AppState, idea_id: &str) -> Result<Idea, ApiError> {
    match state.store.get_idea(idea_id).await {
        Ok(idea) => Ok(idea),
        Err(StoreError::NotFound(_)) => Err(api_not_found("idea not found")),
        Err(err) => Err(api_internal("failed to load idea", &err)),
    }
}

/// Load a notification row, or fail with 404.
pub(crate) async fn fetch_notification(
    state: &AppState,
    notification_id: &str,
) -> Result<Notification, ApiError> {
    match state.store.get_notification(notification_id).await {
        Ok(notification) => Ok(notification),
        Err(StoreError::NotFound(_)) => Err(api_not_found("notification not found")),
        Err(err) => Err(api_internal("failed to load notification", &err)),
    }
}
