//! Idea board data model module.
//!
//! # Purpose
//! Re-exports the core user/idea/interest/notification models used by the API
//! and store layers.
mod idea;
mod interest;
mod notification;
mod user;

pub use idea::{Idea, IdeaCategory, IdeaStage, IdeaStatus, OpenOpportunity};
pub use interest::{InterestSignal, InterestStatus, InterestType};
pub use notification::{Notification, NotificationKind, ENTITY_INTEREST_SIGNAL};
pub use user::{Role, User};
