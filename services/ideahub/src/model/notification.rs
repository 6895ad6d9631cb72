//! Notification model definitions.
//!
//! # Purpose
//! Defines per-user notification rows. Rows are only ever created by the
//! interest workflow (Collaborate/Fund signals on someone else's idea) and
//! mutated or deleted only by their recipient.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Collaboration,
    Funding,
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Collaboration => "collaboration",
            NotificationKind::Funding => "funding",
            NotificationKind::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<NotificationKind> {
        match value {
            "collaboration" => Some(NotificationKind::Collaboration),
            "funding" => Some(NotificationKind::Funding),
            "other" => Some(NotificationKind::Other),
            _ => None,
        }
    }
}

/// Entity type marker for notifications that link back to an interest signal.
pub const ENTITY_INTEREST_SIGNAL: &str = "interest_signal";

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_lowercase() {
        for kind in [
            NotificationKind::Collaboration,
            NotificationKind::Funding,
            NotificationKind::Other,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("Collaboration"), None);
    }
}
