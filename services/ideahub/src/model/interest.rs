//! Interest signal model definitions.
//!
//! # Purpose
//! Defines the interest signal record and its type/status enumerations. The
//! one-active-signal-per-(idea, user) invariant is enforced by the store, not
//! here; withdrawal is a status transition, never a row deletion.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub enum InterestType {
    Collaborate,
    Fund,
    Explore,
    Mentor,
}

impl InterestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestType::Collaborate => "Collaborate",
            InterestType::Fund => "Fund",
            InterestType::Explore => "Explore",
            InterestType::Mentor => "Mentor",
        }
    }

    pub fn parse(value: &str) -> Option<InterestType> {
        match value {
            "Collaborate" => Some(InterestType::Collaborate),
            "Fund" => Some(InterestType::Fund),
            "Explore" => Some(InterestType::Explore),
            "Mentor" => Some(InterestType::Mentor),
            _ => None,
        }
    }

    /// Whether signals of this type notify the idea owner.
    pub fn notifies_owner(&self) -> bool {
        matches!(self, InterestType::Collaborate | InterestType::Fund)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InterestStatus {
    Active,
    Withdrawn,
}

impl InterestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestStatus::Active => "active",
            InterestStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(value: &str) -> Option<InterestStatus> {
        match value {
            "active" => Some(InterestStatus::Active),
            "withdrawn" => Some(InterestStatus::Withdrawn),
            _ => None,
        }
    }
}

/// One user's interest in one idea.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct InterestSignal {
    pub id: String,
    pub idea_id: String,
    pub user_id: String,
    pub interest_type: InterestType,
    pub message: Option<String>,
    pub status: InterestStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_collaborate_and_fund_notify() {
        assert!(InterestType::Collaborate.notifies_owner());
        assert!(InterestType::Fund.notifies_owner());
        assert!(!InterestType::Explore.notifies_owner());
        assert!(!InterestType::Mentor.notifies_owner());
    }

    #[test]
    fn status_round_trips() {
        assert_eq!(
            InterestStatus::parse(InterestStatus::Active.as_str()),
            Some(InterestStatus::Active)
        );
        assert_eq!(
            InterestStatus::parse(InterestStatus::Withdrawn.as_str()),
            Some(InterestStatus::Withdrawn)
        );
        assert_eq!(InterestStatus::parse("Active"), None);
    }
}
