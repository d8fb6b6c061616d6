//! jobquest core data models.
//!
//! This crate defines the progression state, the static catalogs (XP
//! actions, achievements, quest templates) and the notification payloads
//! shared by the storage backends and the progression engine.

#![warn(missing_docs)]

// Identity
mod id;

// Progression state
mod stats;
mod xp;

// Achievements and quests
mod achievement;
mod quest;

// Notifications
mod event;

// Re-exports
pub use id::UserId;

pub use stats::{LevelProgress, UserStats};
pub use xp::{ParseActionError, XpAction};

pub use achievement::{
    default_achievements, AchievementCategory, AchievementCondition, AchievementDefinition,
    AchievementRecord,
};
pub use quest::{
    daily_templates, weekly_templates, QuestBoard, QuestCadence, QuestInstance, QuestTemplate,
    WeekKey,
};

pub use event::{AchievementSummary, ProgressEvent, ProgressSnapshot, XpGained};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar day type
pub type Day = chrono::NaiveDate;
