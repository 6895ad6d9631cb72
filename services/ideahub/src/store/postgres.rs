//! Postgres-backed implementation of the idea board store.
//!
//! # What this module is
//! Implements [`IdeaBoardStore`] using Postgres (via `sqlx`) as the durable
//! backing store for accounts, ideas, interest signals, and notifications.
//!
//! # Key invariants
//! - `interest_signals` carries `UNIQUE (idea_id, user_id)`; creation is a
//!   transactional upsert against that constraint, so two racing creates for
//!   the same pair resolve to exactly one active signal without an
//!   application-level race window.
//! - The user -> ideas cascade runs both soft-delete updates in one
//!   transaction; a partially applied cascade is unobservable.
//! - Soft-deleted rows stay in their tables and are filtered by every read.
//!
//! # Concurrency model
//! - The store is shared across async handlers; `sqlx::PgPool` manages
//!   connection concurrency. Pool sizing and acquire timeouts are explicit
//!   because hanging on a saturated database is worse than failing fast.
//!
//! # Operational notes
//! - Migrations are executed at startup via `sqlx::migrate!("./migrations")`
//!   so handlers can assume the schema exists.
//! - Database URLs may contain credentials; they are never logged.
//!
//! # Data mapping
//! Row structs (`DbUser`, `DbIdea`, ...) are kept separate from the domain
//! types so schema details (column names, string enums) stay localized here
//! and parsing happens in one place.
use super::{
    IdeaBoardStore, IdeaFilter, IdeaPatch, IdeaRecord, IdeaSort, InboxEntry, InterestRecord,
    StoreError, StoreResult, UserFilter, UserPatch, UserRef,
};
use crate::config::PostgresConfig;
use crate::model::{
    Idea, IdeaCategory, IdeaStage, IdeaStatus, InterestSignal, InterestStatus, InterestType,
    Notification, NotificationKind, OpenOpportunity, Role, User,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Durable idea board store backed by Postgres.
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: String,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    affiliation: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    email_verified: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
struct DbIdea {
    id: String,
    title: String,
    description: String,
    short_description: Option<String>,
    category: String,
    stage: String,
    contact_email: Option<String>,
    status: String,
    user_id: String,
    tags: Vec<String>,
    open_opportunities: Value,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Idea row joined with its author and derived active-signal count.
#[derive(Debug, Clone, FromRow)]
struct DbIdeaRecord {
    id: String,
    title: String,
    description: String,
    short_description: Option<String>,
    category: String,
    stage: String,
    contact_email: Option<String>,
    status: String,
    user_id: String,
    tags: Vec<String>,
    open_opportunities: Value,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    author_name: String,
    author_role: String,
    author_avatar_url: Option<String>,
    interest_count: i64,
}

#[derive(Debug, Clone, FromRow)]
struct DbInterest {
    id: String,
    idea_id: String,
    user_id: String,
    interest_type: String,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbInterestRecord {
    id: String,
    idea_id: String,
    user_id: String,
    interest_type: String,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    user_name: String,
    user_role: String,
    user_avatar_url: Option<String>,
    idea_title: String,
}

#[derive(Debug, Clone, FromRow)]
struct DbNotification {
    id: String,
    user_id: String,
    kind: String,
    entity_type: String,
    entity_id: Option<String>,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

/// Notification row joined with its linked signal, requester, and idea.
#[derive(Debug, Clone, FromRow)]
struct DbInboxRow {
    id: String,
    user_id: String,
    kind: String,
    entity_type: String,
    entity_id: Option<String>,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
    interest_message: Option<String>,
    requester_id: Option<String>,
    requester_name: Option<String>,
    requester_role: Option<String>,
    requester_avatar_url: Option<String>,
    idea_id: Option<String>,
    idea_title: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, affiliation, bio, avatar_url, \
     email_verified, last_login_at, created_at, deleted_at";

const IDEA_COLUMNS: &str = "id, title, description, short_description, category, stage, \
     contact_email, status, user_id, tags, open_opportunities, created_at, deleted_at";

const SIGNAL_COLUMNS: &str =
    "id, idea_id, user_id, interest_type, message, status, created_at";

const LIST_IDEAS_NEWEST: &str = r#"
    SELECT i.id, i.title, i.description, i.short_description, i.category, i.stage,
           i.contact_email, i.status, i.user_id, i.tags, i.open_opportunities,
           i.created_at, i.deleted_at,
           u.name AS author_name, u.role AS author_role, u.avatar_url AS author_avatar_url,
           (SELECT COUNT(*) FROM interest_signals s
             WHERE s.idea_id = i.id AND s.status = 'active') AS interest_count
    FROM ideas i
    JOIN users u ON u.id = i.user_id
    WHERE i.status = 'published' AND i.deleted_at IS NULL
      AND ($1::text IS NULL OR i.category = $1)
      AND ($2::text IS NULL OR i.stage = $2)
      AND ($3::text IS NULL
           OR i.title ILIKE '%' || $3 || '%'
           OR i.description ILIKE '%' || $3 || '%')
    ORDER BY i.created_at DESC"#;

const LIST_IDEAS_MOST_INTEREST: &str = r#"
    SELECT i.id, i.title, i.description, i.short_description, i.category, i.stage,
           i.contact_email, i.status, i.user_id, i.tags, i.open_opportunities,
           i.created_at, i.deleted_at,
           u.name AS author_name, u.role AS author_role, u.avatar_url AS author_avatar_url,
           (SELECT COUNT(*) FROM interest_signals s
             WHERE s.idea_id = i.id AND s.status = 'active') AS interest_count
    FROM ideas i
    JOIN users u ON u.id = i.user_id
    WHERE i.status = 'published' AND i.deleted_at IS NULL
      AND ($1::text IS NULL OR i.category = $1)
      AND ($2::text IS NULL OR i.stage = $2)
      AND ($3::text IS NULL
           OR i.title ILIKE '%' || $3 || '%'
           OR i.description ILIKE '%' || $3 || '%')
    ORDER BY interest_count DESC, i.created_at DESC"#;

impl PostgresStore {
    /// Connect to Postgres and run embedded migrations.
    ///
    /// Pool tuning is explicit: `max_connections` protects the database from
    /// overload and `acquire_timeout` bounds how long a request waits for a
    /// pooled connection before failing fast.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let connect_options =
            PgConnectOptions::from_str(&pg.url).map_err(|err| anyhow!(err))?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await
            .map_err(|err| anyhow!(err))?;

        // Migrations run before serving requests; failing startup beats
        // serving handlers against a missing schema.
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| anyhow!(err))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl IdeaBoardStore for PostgresStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let insert = sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, name, role, affiliation, bio,
                                  avatar_url, email_verified, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.affiliation)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.email_verified)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::Conflict("email exists".into()));
            }
            return Err(StoreError::Unexpected(err.into()));
        }
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        match row {
            Some(row) => user_from_db(row),
            None => Err(StoreError::NotFound("user".into())),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        row.map(user_from_db).transpose()
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, DbUser>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users
               WHERE deleted_at IS NULL
                 AND ($1::text IS NULL OR role = $1)
                 AND ($2::text IS NULL
                      OR name ILIKE '%' || $2 || '%'
                      OR email ILIKE '%' || $2 || '%')
               ORDER BY created_at DESC"#
        ))
        .bind(filter.role.map(|role| role.as_str()))
        .bind(filter.search.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(into_unexpected)?;
        rows.into_iter().map(user_from_db).collect()
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<User> {
        let mut tx = self.pool.begin().await.map_err(into_unexpected)?;
        let current = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(into_unexpected)?;
        let mut user = match current {
            Some(row) => user_from_db(row)?,
            None => return Err(StoreError::NotFound("user".into())),
        };

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

        sqlx::query(
            r#"UPDATE users SET name = $1, affiliation = $2, bio = $3, avatar_url = $4
               WHERE id = $5"#,
        )
        .bind(&user.name)
        .bind(&user.affiliation)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(into_unexpected)?;

        tx.commit().await.map_err(into_unexpected)?;
        Ok(user)
    }

    /// Soft-delete the user and every idea it owns in one transaction.
    ///
    /// Both updates share the commit, so there is no observable state with
    /// the account gone and its ideas still listed (or the reverse).
    async fn delete_user_cascade(&self, user_id: &str) -> StoreResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(into_unexpected)?;

        let deleted = sqlx::query(
            "UPDATE users SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(into_unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound("user".into()));
        }

        sqlx::query(
            "UPDATE ideas SET deleted_at = $2 WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(into_unexpected)?;

        tx.commit().await.map_err(into_unexpected)?;
        Ok(())
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let updated = sqlx::query(
            "UPDATE users SET last_login_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(into_unexpected)?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound("user".into()));
        }
        Ok(())
    }

    async fn upsert_admin(&self, user: User) -> StoreResult<User> {
        // No-op update on conflict so the existing row comes back unchanged.
        let row = sqlx::query_as::<_, DbUser>(&format!(
            r#"INSERT INTO users (id, email, password_hash, name, role, affiliation, bio,
                                  avatar_url, email_verified, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.affiliation)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.email_verified)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(into_unexpected)?;
        user_from_db(row)
    }

    async fn create_idea(&self, idea: Idea) -> StoreResult<Idea> {
        sqlx::query(
            r#"INSERT INTO ideas (id, title, description, short_description, category, stage,
                                  contact_email, status, user_id, tags, open_opportunities,
                                  created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(&idea.id)
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(&idea.short_description)
        .bind(idea.category.as_str())
        .bind(idea.stage.as_str())
        .bind(&idea.contact_email)
        .bind(idea.status.as_str())
        .bind(&idea.user_id)
        .bind(&idea.tags)
        .bind(serde_json::to_value(&idea.open_opportunities).unwrap_or(Value::Null))
        .bind(idea.created_at)
        .execute(&self.pool)
        .await
        .map_err(into_unexpected)?;
        Ok(idea)
    }

    async fn get_idea(&self, idea_id: &str) -> StoreResult<Idea> {
        let row = sqlx::query_as::<_, DbIdea>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(idea_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        match row {
            Some(row) => idea_from_db(row),
            None => Err(StoreError::NotFound("idea".into())),
        }
    }

    async fn get_idea_record(&self, idea_id: &str) -> StoreResult<IdeaRecord> {
        let row = sqlx::query_as::<_, DbIdeaRecord>(
            r#"SELECT i.id, i.title, i.description, i.short_description, i.category, i.stage,
                      i.contact_email, i.status, i.user_id, i.tags, i.open_opportunities,
                      i.created_at, i.deleted_at,
                      u.name AS author_name, u.role AS author_role,
                      u.avatar_url AS author_avatar_url,
                      (SELECT COUNT(*) FROM interest_signals s
                        WHERE s.idea_id = i.id AND s.status = 'active') AS interest_count
               FROM ideas i
               JOIN users u ON u.id = i.user_id
               WHERE i.id = $1 AND i.deleted_at IS NULL"#,
        )
        .bind(idea_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        match row {
            Some(row) => idea_record_from_db(row),
            None => Err(StoreError::NotFound("idea".into())),
        }
    }

    async fn list_ideas(&self, filter: &IdeaFilter) -> StoreResult<Vec<IdeaRecord>> {
        let query = match filter.sort {
            IdeaSort::Newest => LIST_IDEAS_NEWEST,
            IdeaSort::MostInterest => LIST_IDEAS_MOST_INTEREST,
        };
        let rows = sqlx::query_as::<_, DbIdeaRecord>(query)
            .bind(filter.category.map(|category| category.as_str()))
            .bind(filter.stage.map(|stage| stage.as_str()))
            .bind(filter.search.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(into_unexpected)?;
        rows.into_iter().map(idea_record_from_db).collect()
    }

    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> StoreResult<Idea> {
        let mut tx = self.pool.begin().await.map_err(into_unexpected)?;
        let current = sqlx::query_as::<_, DbIdea>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        ))
        .bind(idea_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(into_unexpected)?;
        let mut idea = match current {
            Some(row) => idea_from_db(row)?,
            None => return Err(StoreError::NotFound("idea".into())),
        };

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

        sqlx::query(
            r#"UPDATE ideas SET title = $1, description = $2, short_description = $3,
                                category = $4, stage = $5, contact_email = $6, tags = $7,
                                open_opportunities = $8
               WHERE id = $9"#,
        )
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(&idea.short_description)
        .bind(idea.category.as_str())
        .bind(idea.stage.as_str())
        .bind(&idea.contact_email)
        .bind(&idea.tags)
        .bind(serde_json::to_value(&idea.open_opportunities).unwrap_or(Value::Null))
        .bind(idea_id)
        .execute(&mut *tx)
        .await
        .map_err(into_unexpected)?;

        tx.commit().await.map_err(into_unexpected)?;
        Ok(idea)
    }

    async fn delete_idea(&self, idea_id: &str) -> StoreResult<()> {
        let deleted = sqlx::query(
            "UPDATE ideas SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(idea_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(into_unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound("idea".into()));
        }
        Ok(())
    }

    /// Transactional insert-or-reactivate against the pair constraint.
    ///
    /// The `DO UPDATE ... WHERE status = 'withdrawn'` arm only fires for a
    /// withdrawn row; an existing active row matches neither arm, so the
    /// statement returns no row and the call reports a conflict. Both racing
    /// creates funnel through the same unique index, so the database decides
    /// the winner.
    async fn upsert_interest(&self, signal: InterestSignal) -> StoreResult<InterestSignal> {
        let row = sqlx::query_as::<_, DbInterest>(&format!(
            r#"INSERT INTO interest_signals (id, idea_id, user_id, interest_type, message,
                                             status, created_at)
               VALUES ($1, $2, $3, $4, $5, 'active', $6)
               ON CONFLICT (idea_id, user_id) DO UPDATE
                   SET interest_type = EXCLUDED.interest_type,
                       message = EXCLUDED.message,
                       status = 'active',
                       created_at = EXCLUDED.created_at
                   WHERE interest_signals.status = 'withdrawn'
               RETURNING {SIGNAL_COLUMNS}"#
        ))
        .bind(&signal.id)
        .bind(&signal.idea_id)
        .bind(&signal.user_id)
        .bind(signal.interest_type.as_str())
        .bind(&signal.message)
        .bind(signal.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;

        match row {
            Some(row) => {
                let op = if row.id == signal.id {
                    "created"
                } else {
                    "reactivated"
                };
                metrics::counter!("ideahub_interest_signals_total", "op" => op).increment(1);
                interest_from_db(row)
            }
            None => Err(StoreError::Conflict("interest exists".into())),
        }
    }

    async fn withdraw_interest(&self, idea_id: &str, user_id: &str) -> StoreResult<()> {
        // Unconditional status flip: withdrawing an already-withdrawn signal
        // succeeds without side effects.
        let updated = sqlx::query(
            "UPDATE interest_signals SET status = 'withdrawn' WHERE idea_id = $1 AND user_id = $2",
        )
        .bind(idea_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(into_unexpected)?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound("interest".into()));
        }
        metrics::counter!("ideahub_interest_signals_total", "op" => "withdrawn").increment(1);
        Ok(())
    }

    async fn list_interests(
        &self,
        idea_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<InterestRecord>> {
        let rows = sqlx::query_as::<_, DbInterestRecord>(
            r#"SELECT s.id, s.idea_id, s.user_id, s.interest_type, s.message, s.status,
                      s.created_at,
                      u.name AS user_name, u.role AS user_role, u.avatar_url AS user_avatar_url,
                      i.title AS idea_title
               FROM interest_signals s
               JOIN users u ON u.id = s.user_id
               JOIN ideas i ON i.id = s.idea_id
               WHERE s.status = 'active'
                 AND ($1::text IS NULL OR s.idea_id = $1)
                 AND ($2::text IS NULL OR s.user_id = $2)
               ORDER BY s.created_at DESC"#,
        )
        .bind(idea_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(into_unexpected)?;
        rows.into_iter().map(interest_record_from_db).collect()
    }

    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification> {
        sqlx::query(
            r#"INSERT INTO notifications (id, user_id, type, entity_type, entity_id, message,
                                          read, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.entity_type)
        .bind(&notification.entity_id)
        .bind(&notification.message)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(into_unexpected)?;
        metrics::counter!("ideahub_notifications_total", "op" => "created").increment(1);
        Ok(notification)
    }

    async fn get_notification(&self, notification_id: &str) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, DbNotification>(
            r#"SELECT id, user_id, type AS kind, entity_type, entity_id, message, read,
                      created_at
               FROM notifications WHERE id = $1"#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        match row {
            Some(row) => notification_from_db(row),
            None => Err(StoreError::NotFound("notification".into())),
        }
    }

    async fn list_inbox(&self, user_id: &str, read: Option<bool>) -> StoreResult<Vec<InboxEntry>> {
        // The signal/requester/idea join is the read path; nothing from it is
        // stored on the notification row.
        let rows = sqlx::query_as::<_, DbInboxRow>(
            r#"SELECT n.id, n.user_id, n.type AS kind, n.entity_type, n.entity_id, n.message,
                      n.read, n.created_at,
                      s.message AS interest_message, s.user_id AS requester_id,
                      ru.name AS requester_name, ru.role AS requester_role,
                      ru.avatar_url AS requester_avatar_url,
                      i.id AS idea_id, i.title AS idea_title
               FROM notifications n
               LEFT JOIN interest_signals s
                      ON n.entity_type = 'interest_signal' AND s.id = n.entity_id
               LEFT JOIN users ru ON ru.id = s.user_id
               LEFT JOIN ideas i ON i.id = s.idea_id
               WHERE n.user_id = $1
                 AND n.type IN ('collaboration', 'funding')
                 AND ($2::bool IS NULL OR n.read = $2)
               ORDER BY n.created_at DESC"#,
        )
        .bind(user_id)
        .bind(read)
        .fetch_all(&self.pool)
        .await
        .map_err(into_unexpected)?;
        rows.into_iter().map(inbox_entry_from_db).collect()
    }

    async fn set_notification_read(
        &self,
        notification_id: &str,
        read: bool,
    ) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, DbNotification>(
            r#"UPDATE notifications SET read = $2 WHERE id = $1
               RETURNING id, user_id, type AS kind, entity_type, entity_id, message, read,
                         created_at"#,
        )
        .bind(notification_id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_unexpected)?;
        match row {
            Some(row) => notification_from_db(row),
            None => Err(StoreError::NotFound("notification".into())),
        }
    }

    async fn delete_notification(&self, notification_id: &str) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(into_unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound("notification".into()));
        }
        metrics::counter!("ideahub_notifications_total", "op" => "deleted").increment(1);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(into_unexpected)?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn into_unexpected(err: sqlx::Error) -> StoreError {
    StoreError::Unexpected(err.into())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

fn parse_role(value: &str) -> StoreResult<Role> {
    Role::parse(value).ok_or_else(|| StoreError::Unexpected(anyhow!("invalid role {value}")))
}

fn user_from_db(row: DbUser) -> StoreResult<User> {
    Ok(User {
        role: parse_role(&row.role)?,
        id: row.id,
        email: row.email,
        password_hash: row.password_hash,
        name: row.name,
        affiliation: row.affiliation,
        bio: row.bio,
        avatar_url: row.avatar_url,
        email_verified: row.email_verified,
        last_login_at: row.last_login_at,
        created_at: row.created_at,
        deleted_at: row.deleted_at,
    })
}

fn idea_from_db(row: DbIdea) -> StoreResult<Idea> {
    Ok(Idea {
        category: IdeaCategory::parse(&row.category)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid category {}", row.category)))?,
        stage: IdeaStage::parse(&row.stage)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid stage {}", row.stage)))?,
        status: IdeaStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid status {}", row.status)))?,
        open_opportunities: opportunities_from_json(row.open_opportunities)?,
        id: row.id,
        title: row.title,
        description: row.description,
        short_description: row.short_description,
        contact_email: row.contact_email,
        user_id: row.user_id,
        tags: row.tags,
        created_at: row.created_at,
        deleted_at: row.deleted_at,
    })
}

fn idea_record_from_db(row: DbIdeaRecord) -> StoreResult<IdeaRecord> {
    let author = UserRef {
        id: row.user_id.clone(),
        name: row.author_name.clone(),
        role: parse_role(&row.author_role)?,
        avatar_url: row.author_avatar_url.clone(),
    };
    let interest_count = row.interest_count.max(0) as u64;
    let idea = idea_from_db(DbIdea {
        id: row.id,
        title: row.title,
        description: row.description,
        short_description: row.short_description,
        category: row.category,
        stage: row.stage,
        contact_email: row.contact_email,
        status: row.status,
        user_id: row.user_id,
        tags: row.tags,
        open_opportunities: row.open_opportunities,
        created_at: row.created_at,
        deleted_at: row.deleted_at,
    })?;
    Ok(IdeaRecord {
        idea,
        author,
        interest_count,
    })
}

fn opportunities_from_json(value: Value) -> StoreResult<Vec<OpenOpportunity>> {
    if value.is_null() {
        return Ok(vec![]);
    }
    serde_json::from_value(value)
        .map_err(|err| StoreError::Unexpected(anyhow!("invalid open opportunities: {err}")))
}

fn interest_from_db(row: DbInterest) -> StoreResult<InterestSignal> {
    Ok(InterestSignal {
        interest_type: InterestType::parse(&row.interest_type).ok_or_else(|| {
            StoreError::Unexpected(anyhow!("invalid interest type {}", row.interest_type))
        })?,
        status: InterestStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid status {}", row.status)))?,
        id: row.id,
        idea_id: row.idea_id,
        user_id: row.user_id,
        message: row.message,
        created_at: row.created_at,
    })
}

fn interest_record_from_db(row: DbInterestRecord) -> StoreResult<InterestRecord> {
    let user = UserRef {
        id: row.user_id.clone(),
        name: row.user_name.clone(),
        role: parse_role(&row.user_role)?,
        avatar_url: row.user_avatar_url.clone(),
    };
    let signal = interest_from_db(DbInterest {
        id: row.id,
        idea_id: row.idea_id,
        user_id: row.user_id,
        interest_type: row.interest_type,
        message: row.message,
        status: row.status,
        created_at: row.created_at,
    })?;
    Ok(InterestRecord {
        signal,
        user,
        idea_title: row.idea_title,
    })
}

fn notification_from_db(row: DbNotification) -> StoreResult<Notification> {
    Ok(Notification {
        kind: NotificationKind::parse(&row.kind)
            .ok_or_else(|| StoreError::Unexpected(anyhow!("invalid kind {}", row.kind)))?,
        id: row.id,
        user_id: row.user_id,
        entity_type: row.entity_type,
        entity_id: row.entity_id,
        message: row.message,
        read: row.read,
        created_at: row.created_at,
    })
}

fn inbox_entry_from_db(row: DbInboxRow) -> StoreResult<InboxEntry> {
    let requester = match (row.requester_id, row.requester_name, row.requester_role) {
        (Some(id), Some(name), Some(role)) => Some(UserRef {
            id,
            name,
            role: parse_role(&role)?,
            avatar_url: row.requester_avatar_url,
        }),
        _ => None,
    };
    let notification = notification_from_db(DbNotification {
        id: row.id,
        user_id: row.user_id,
        kind: row.kind,
        entity_type: row.entity_type,
        entity_id: row.entity_id,
        message: row.message,
        read: row.read,
        created_at: row.created_at,
    })?;
    Ok(InboxEntry {
        notification,
        idea_id: row.idea_id,
        idea_title: row.idea_title,
        requester,
        interest_message: row.interest_message,
    })
}
