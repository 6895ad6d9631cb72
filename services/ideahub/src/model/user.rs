//! User model definitions.
//!
//! # Purpose
//! Defines user accounts and the role enumeration that drives RBAC decisions.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role assigned at registration.
///
/// Roles are a closed set; the permission table in `auth::rbac` maps each
/// variant to its allowed actions.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Alumni,
    Professor,
    Mentor,
    Investor,
    External,
    Admin,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Student,
        Role::Alumni,
        Role::Professor,
        Role::Mentor,
        Role::Investor,
        Role::External,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Alumni => "Alumni",
            Role::Professor => "Professor",
            Role::Mentor => "Mentor",
            Role::Investor => "Investor",
            Role::External => "External",
            Role::Admin => "Admin",
        }
    }

    /// Parse the canonical wire/storage spelling of a role.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "Student" => Some(Role::Student),
            "Alumni" => Some(Role::Alumni),
            "Professor" => Some(Role::Professor),
            "Mentor" => Some(Role::Mentor),
            "Investor" => Some(Role::Investor),
            "External" => Some(Role::External),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Registered account.
///
/// `deleted_at` is the soft-delete marker; a populated value hides the user
/// from every read path. Deleting a user also soft-deletes the ideas it owns,
/// in the same atomic unit (see the store implementations).
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
