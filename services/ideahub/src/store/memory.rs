//! In-memory implementation of the idea board store.
//!
//! # Purpose
//! This store implements the [`IdeaBoardStore`] trait entirely in memory using
//! `HashMap`s guarded by `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: mutations take write locks, reads take
//!   read locks, so operations are consistent within one process.
//!
//! # Invariant enforcement
//! - Interest signals are stored in a single map keyed by
//!   `(idea_id, user_id)`, so pair uniqueness is structural: two racing
//!   creates serialize on the write lock and the loser observes the winner's
//!   active row.
//! - The user -> ideas cascade holds the user and idea write locks together
//!   for the whole mutation, so no reader can observe a deleted user with
//!   live ideas.
//!
//! # Performance characteristics
//! - Reads are cheap and concurrent; list paths scan and sort in memory,
//!   which is acceptable for dev/test workloads.
use super::{
    IdeaBoardStore, IdeaFilter, IdeaPatch, IdeaRecord, IdeaSort, InboxEntry, InterestRecord,
    StoreError, StoreResult, UserFilter, UserPatch, UserRef,
};
use crate::model::{
    Idea, IdeaStatus, InterestSignal, InterestStatus, Notification, NotificationKind, User,
    ENTITY_INTEREST_SIGNAL,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory idea board store.
///
/// All maps are wrapped in `Arc<RwLock<...>>` so the store can be cloned and
/// shared across async request handlers.
#[derive(Default)]
pub struct InMemoryStore {
    /// Accounts keyed by user id (soft-deleted rows stay in the map).
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Ideas keyed by idea id (soft-deleted rows stay in the map).
    ideas: Arc<RwLock<HashMap<String, Idea>>>,
    /// Interest signals keyed by `(idea_id, user_id)`.
    ///
    /// The key shape is the uniqueness constraint: one row per pair,
    /// regardless of status.
    interests: Arc<RwLock<HashMap<(String, String), InterestSignal>>>,
    /// Notifications keyed by notification id.
    notifications: Arc<RwLock<HashMap<String, Notification>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl IdeaBoardStore for InMemoryStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        // Email uniqueness mirrors the database constraint: it applies to
        // soft-deleted rows too.
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("email exists".into()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(user_id)
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email && user.deleted_at.is_none())
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users
            .values()
            .filter(|user| user.deleted_at.is_none())
            .filter(|user| filter.role.map_or(true, |role| user.role == role))
            .filter(|user| {
                filter.search.as_deref().map_or(true, |needle| {
                    contains_ci(&user.name, needle) || contains_ci(&user.email, needle)
                })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(affiliation) = patch.affiliation {
            user.affiliation = Some(affiliation);
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar_url) = patch.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        Ok(user.clone())
    }

    async fn delete_user_cascade(&self, user_id: &str) -> StoreResult<()> {
        // Hold both write locks for the whole cascade so the user and its
        // ideas disappear in one step.
        let mut users = self.users.write().await;
        let mut ideas = self.ideas.write().await;
        let user = users
            .get_mut(user_id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        let now = Utc::now();
        user.deleted_at = Some(now);
        for idea in ideas.values_mut() {
            if idea.user_id == user_id && idea.deleted_at.is_none() {
                idea.deleted_at = Some(now);
            }
        }
        metrics::gauge!("ideahub_ideas_total").set(
            ideas
                .values()
                .filter(|idea| idea.deleted_at.is_none())
                .count() as f64,
        );
        Ok(())
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.last_login_at = Some(at);
        Ok(())
    }

    async fn upsert_admin(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.values().find(|existing| existing.email == user.email) {
            return Ok(existing.clone());
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn create_idea(&self, idea: Idea) -> StoreResult<Idea> {
        let mut ideas = self.ideas.write().await;
        ideas.insert(idea.id.clone(), idea.clone());
        metrics::gauge!("ideahub_ideas_total").set(
            ideas
                .values()
                .filter(|idea| idea.deleted_at.is_none())
                .count() as f64,
        );
        Ok(idea)
    }

    async fn get_idea(&self, idea_id: &str) -> StoreResult<Idea> {
        self.ideas
            .read()
            .await
            .get(idea_id)
            .filter(|idea| idea.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("idea".into()))
    }

    async fn get_idea_record(&self, idea_id: &str) -> StoreResult<IdeaRecord> {
        let idea = self.get_idea(idea_id).await?;
        let users = self.users.read().await;
        let author = users
            .get(&idea.user_id)
            .map(UserRef::of)
            .ok_or_else(|| StoreError::Unexpected(anyhow::anyhow!("idea author missing")))?;
        let interests = self.interests.read().await;
        let interest_count = interests
            .values()
            .filter(|signal| signal.idea_id == idea.id && signal.status == InterestStatus::Active)
            .count() as u64;
        Ok(IdeaRecord {
            idea,
            author,
            interest_count,
        })
    }

    async fn list_ideas(&self, filter: &IdeaFilter) -> StoreResult<Vec<IdeaRecord>> {
        let ideas = self.ideas.read().await;
        let users = self.users.read().await;
        let interests = self.interests.read().await;

        let mut records: Vec<IdeaRecord> = ideas
            .values()
            .filter(|idea| idea.deleted_at.is_none() && idea.status == IdeaStatus::Published)
            .filter(|idea| filter.category.map_or(true, |c| idea.category == c))
            .filter(|idea| filter.stage.map_or(true, |s| idea.stage == s))
            .filter(|idea| {
                filter.search.as_deref().map_or(true, |needle| {
                    contains_ci(&idea.title, needle) || contains_ci(&idea.description, needle)
                })
            })
            .filter_map(|idea| {
                let author = users.get(&idea.user_id).map(UserRef::of)?;
                let interest_count = interests
                    .values()
                    .filter(|signal| {
                        signal.idea_id == idea.id && signal.status == InterestStatus::Active
                    })
                    .count() as u64;
                Some(IdeaRecord {
                    idea: idea.clone(),
                    author,
                    interest_count,
                })
            })
            .collect();

        match filter.sort {
            IdeaSort::Newest => {
                records.sort_by(|a, b| b.idea.created_at.cmp(&a.idea.created_at));
            }
            IdeaSort::MostInterest => {
                records.sort_by(|a, b| {
                    b.interest_count
                        .cmp(&a.interest_count)
                        .then(b.idea.created_at.cmp(&a.idea.created_at))
                });
            }
        }
        Ok(records)
    }

    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> StoreResult<Idea> {
        let mut ideas = self.ideas.write().await;
        let idea = ideas
            .get_mut(idea_id)
            .filter(|idea| idea.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("idea".into()))?;
        if let Some(title) = patch.title {
            idea.title = title;
        }
        if let Some(description) = patch.description {
            idea.description = description;
        }
        if let Some(short_description) = patch.short_description {
            idea.short_description = Some(short_description);
        }
        if let Some(category) = patch.category {
            idea.category = category;
        }
        if let Some(stage) = patch.stage {
            idea.stage = stage;
        }
        if let Some(contact_email) = patch.contact_email {
            idea.contact_email = Some(contact_email);
        }
        if let Some(tags) = patch.tags {
            idea.tags = tags;
        }
        if let Some(open_opportunities) = patch.open_opportunities {
            idea.open_opportunities = open_opportunities;
        }
        Ok(idea.clone())
    }

    async fn delete_idea(&self, idea_id: &str) -> StoreResult<()> {
        let mut ideas = self.ideas.write().await;
        let idea = ideas
            .get_mut(idea_id)
            .filter(|idea| idea.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("idea".into()))?;
        idea.deleted_at = Some(Utc::now());
        metrics::gauge!("ideahub_ideas_total").set(
            ideas
                .values()
                .filter(|idea| idea.deleted_at.is_none())
                .count() as f64,
        );
        Ok(())
    }

    async fn upsert_interest(&self, signal: InterestSignal) -> StoreResult<InterestSignal> {
        let key = (signal.idea_id.clone(), signal.user_id.clone());
        let mut interests = self.interests.write().await;
        match interests.get_mut(&key) {
            Some(existing) if existing.status == InterestStatus::Active => {
                Err(StoreError::Conflict("interest exists".into()))
            }
            Some(existing) => {
                // Reactivate the withdrawn row in place, keeping its id so
                // notifications that reference it stay valid.
                existing.status = InterestStatus::Active;
                existing.interest_type = signal.interest_type;
                existing.message = signal.message;
                existing.created_at = signal.created_at;
                metrics::counter!("ideahub_interest_signals_total", "op" => "reactivated")
                    .increment(1);
                Ok(existing.clone())
            }
            None => {
                interests.insert(key, signal.clone());
                metrics::counter!("ideahub_interest_signals_total", "op" => "created").increment(1);
                Ok(signal)
            }
        }
    }

    async fn withdraw_interest(&self, idea_id: &str, user_id: &str) -> StoreResult<()> {
        let key = (idea_id.to_string(), user_id.to_string());
        let mut interests = self.interests.write().await;
        let signal = interests
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound("interest".into()))?;
        // Withdrawing twice is not an error; the second call is a no-op.
        signal.status = InterestStatus::Withdrawn;
        metrics::counter!("ideahub_interest_signals_total", "op" => "withdrawn").increment(1);
        Ok(())
    }

    async fn list_interests(
        &self,
        idea_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<InterestRecord>> {
        let interests = self.interests.read().await;
        let users = self.users.read().await;
        let ideas = self.ideas.read().await;
        let mut records: Vec<InterestRecord> = interests
            .values()
            .filter(|signal| signal.status == InterestStatus::Active)
            .filter(|signal| idea_id.map_or(true, |id| signal.idea_id == id))
            .filter(|signal| user_id.map_or(true, |id| signal.user_id == id))
            .filter_map(|signal| {
                let user = users.get(&signal.user_id).map(UserRef::of)?;
                let idea_title = ideas.get(&signal.idea_id).map(|idea| idea.title.clone())?;
                Some(InterestRecord {
                    signal: signal.clone(),
                    user,
                    idea_title,
                })
            })
            .collect();
        records.sort_by(|a, b| b.signal.created_at.cmp(&a.signal.created_at));
        Ok(records)
    }

    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.notifications
            .write()
            .await
            .insert(notification.id.clone(), notification.clone());
        metrics::counter!("ideahub_notifications_total", "op" => "created").increment(1);
        Ok(notification)
    }

    async fn get_notification(&self, notification_id: &str) -> StoreResult<Notification> {
        self.notifications
            .read()
            .await
            .get(notification_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("notification".into()))
    }

    async fn list_inbox(&self, user_id: &str, read: Option<bool>) -> StoreResult<Vec<InboxEntry>> {
        let notifications = self.notifications.read().await;
        let interests = self.interests.read().await;
        let users = self.users.read().await;
        let ideas = self.ideas.read().await;

        let mut entries: Vec<InboxEntry> = notifications
            .values()
            .filter(|notification| notification.user_id == user_id)
            .filter(|notification| {
                matches!(
                    notification.kind,
                    NotificationKind::Collaboration | NotificationKind::Funding
                )
            })
            .filter(|notification| read.map_or(true, |read| notification.read == read))
            .map(|notification| {
                // Resolve the linked signal at read time; the join is part of
                // the read path, never stored on the notification row.
                let signal = match notification.entity_id.as_deref() {
                    Some(entity_id) if notification.entity_type == ENTITY_INTEREST_SIGNAL => {
                        interests.values().find(|signal| signal.id == entity_id)
                    }
                    _ => None,
                };
                let requester =
                    signal.and_then(|signal| users.get(&signal.user_id).map(UserRef::of));
                let idea = signal.and_then(|signal| ideas.get(&signal.idea_id));
                InboxEntry {
                    notification: notification.clone(),
                    idea_id: idea.map(|idea| idea.id.clone()),
                    idea_title: idea.map(|idea| idea.title.clone()),
                    requester,
                    interest_message: signal.and_then(|signal| signal.message.clone()),
                }
            })
            .collect();
        entries.sort_by(|a, b| b.notification.created_at.cmp(&a.notification.created_at));
        Ok(entries)
    }

    async fn set_notification_read(
        &self,
        notification_id: &str,
        read: bool,
    ) -> StoreResult<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .get_mut(notification_id)
            .ok_or_else(|| StoreError::NotFound("notification".into()))?;
        notification.read = read;
        Ok(notification.clone())
    }

    async fn delete_notification(&self, notification_id: &str) -> StoreResult<()> {
        let mut notifications = self.notifications.write().await;
        if notifications.remove(notification_id).is_none() {
            return Err(StoreError::NotFound("notification".into()));
        }
        metrics::counter!("ideahub_notifications_total", "op" => "deleted").increment(1);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always healthy if the process is running.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
