//! Storage abstraction for the idea board.
//!
//! # Purpose
//! Defines the [`IdeaBoardStore`] trait implemented by the in-memory and
//! Postgres backends, plus the error and record types shared by both.
//!
//! # Key invariants
//! - At most one interest signal row exists per (idea, user) pair, whatever
//!   its status. [`IdeaBoardStore::upsert_interest`] is the only write path
//!   for signals and must enforce this with the backend's native uniqueness
//!   guarantee, not a check-then-insert.
//! - Deleting a user soft-deletes the user row and every idea it owns as one
//!   atomic unit; no reader may observe one without the other.
//! - Soft-deleted rows are invisible to every read path.
use crate::model::{Idea, IdeaCategory, IdeaStage, InterestSignal, Notification, Role, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Listing order for ideas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdeaSort {
    /// Creation time descending.
    #[default]
    Newest,
    /// Active interest count descending, ties by creation time descending.
    MostInterest,
}

#[derive(Debug, Clone, Default)]
pub struct IdeaFilter {
    pub category: Option<IdeaCategory>,
    pub stage: Option<IdeaStage>,
    pub search: Option<String>,
    pub sort: IdeaSort,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub search: Option<String>,
}

/// Field-wise update for a user profile. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Field-wise update for an idea. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<IdeaCategory>,
    pub stage: Option<IdeaStage>,
    pub contact_email: Option<String>,
    pub tags: Option<Vec<String>>,
    pub open_opportunities: Option<Vec<crate::model::OpenOpportunity>>,
}

/// Public identity of a user embedded in read-path joins.
#[derive(Debug, Clone)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

impl UserRef {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// An idea joined with its author and derived active-interest count.
#[derive(Debug, Clone)]
pub struct IdeaRecord {
    pub idea: Idea,
    pub author: UserRef,
    pub interest_count: u64,
}

/// An active signal joined with its requester and idea title.
#[derive(Debug, Clone)]
pub struct InterestRecord {
    pub signal: InterestSignal,
    pub user: UserRef,
    pub idea_title: String,
}

/// A notification resolved for the inbox view.
///
/// The linked signal, requester, and idea are looked up at read time; they
/// are `None` when the linked entity no longer resolves.
#[derive(Debug, Clone)]
pub struct InboxEntry {
    pub notification: Notification,
    pub idea_id: Option<String>,
    pub idea_title: Option<String>,
    pub requester: Option<UserRef>,
    pub interest_message: Option<String>,
}

#[async_trait]
pub trait IdeaBoardStore: Send + Sync {
    // Users
    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn get_user(&self, user_id: &str) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;
    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<User>;
    /// Soft-delete the user and every idea it owns, atomically.
    async fn delete_user_cascade(&self, user_id: &str) -> StoreResult<()>;
    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> StoreResult<()>;
    /// Idempotent admin bootstrap: insert the account or return the existing
    /// row with the same email untouched.
    async fn upsert_admin(&self, user: User) -> StoreResult<User>;

    // Ideas
    async fn create_idea(&self, idea: Idea) -> StoreResult<Idea>;
    async fn get_idea(&self, idea_id: &str) -> StoreResult<Idea>;
    async fn get_idea_record(&self, idea_id: &str) -> StoreResult<IdeaRecord>;
    async fn list_ideas(&self, filter: &IdeaFilter) -> StoreResult<Vec<IdeaRecord>>;
    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> StoreResult<Idea>;
    async fn delete_idea(&self, idea_id: &str) -> StoreResult<()>;

    // Interest signals
    /// Insert a new active signal, or atomically reactivate a withdrawn one
    /// for the same (idea, user) pair. Fails with [`StoreError::Conflict`]
    /// when an active signal already exists.
    async fn upsert_interest(&self, signal: InterestSignal) -> StoreResult<InterestSignal>;
    /// Flip the pair's signal to withdrawn. Succeeds when the signal is
    /// already withdrawn; fails with NotFound when no row exists.
    async fn withdraw_interest(&self, idea_id: &str, user_id: &str) -> StoreResult<()>;
    /// Active signals, optionally narrowed to one idea and/or one user.
    async fn list_interests(
        &self,
        idea_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<InterestRecord>>;

    // Notifications
    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification>;
    async fn get_notification(&self, notification_id: &str) -> StoreResult<Notification>;
    async fn list_inbox(&self, user_id: &str, read: Option<bool>) -> StoreResult<Vec<InboxEntry>>;
    async fn set_notification_read(
        &self,
        notification_id: &str,
        read: bool,
    ) -> StoreResult<Notification>;
    async fn delete_notification(&self, notification_id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
