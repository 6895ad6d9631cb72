//! Idea model definitions.
//!
//! # Purpose
//! Defines idea records, the category/stage/status enumerations, and the open
//! opportunity payload embedded in each idea.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub enum IdeaCategory {
    Tech,
    Healthcare,
    Sustainability,
    SocialImpact,
    Education,
    Other,
}

impl IdeaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaCategory::Tech => "Tech",
            IdeaCategory::Healthcare => "Healthcare",
            IdeaCategory::Sustainability => "Sustainability",
            IdeaCategory::SocialImpact => "SocialImpact",
            IdeaCategory::Education => "Education",
            IdeaCategory::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<IdeaCategory> {
        match value {
            "Tech" => Some(IdeaCategory::Tech),
            "Healthcare" => Some(IdeaCategory::Healthcare),
            "Sustainability" => Some(IdeaCategory::Sustainability),
            "SocialImpact" => Some(IdeaCategory::SocialImpact),
            "Education" => Some(IdeaCategory::Education),
            "Other" => Some(IdeaCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub enum IdeaStage {
    Idea,
    EarlyDevelopment,
    Prototype,
    SeekingFunding,
}

impl IdeaStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStage::Idea => "Idea",
            IdeaStage::EarlyDevelopment => "EarlyDevelopment",
            IdeaStage::Prototype => "Prototype",
            IdeaStage::SeekingFunding => "SeekingFunding",
        }
    }

    pub fn parse(value: &str) -> Option<IdeaStage> {
        match value {
            "Idea" => Some(IdeaStage::Idea),
            "EarlyDevelopment" => Some(IdeaStage::EarlyDevelopment),
            "Prototype" => Some(IdeaStage::Prototype),
            "SeekingFunding" => Some(IdeaStage::SeekingFunding),
            _ => None,
        }
    }
}

/// Publication state of an idea.
///
/// Listings only surface `Published` ideas. `Draft` and `Archived` exist for
/// moderation workflows; the public submission path always publishes.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IdeaStatus {
    Published,
    Draft,
    Archived,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Published => "published",
            IdeaStatus::Draft => "draft",
            IdeaStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<IdeaStatus> {
        match value {
            "published" => Some(IdeaStatus::Published),
            "draft" => Some(IdeaStatus::Draft),
            "archived" => Some(IdeaStatus::Archived),
            _ => None,
        }
    }
}

/// A role the idea owner is looking to fill.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpenOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub engagement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Startup idea record.
///
/// The owner (`user_id`) is immutable after creation. The active interest
/// count is never stored on the row; it is derived by counting active
/// signals at read time.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: IdeaCategory,
    pub stage: IdeaStage,
    pub contact_email: Option<String>,
    pub status: IdeaStatus,
    pub user_id: String,
    pub tags: Vec<String>,
    pub open_opportunities: Vec<OpenOpportunity>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
