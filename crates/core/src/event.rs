//! Notifications published by the progression engine.

use serde::{Deserialize, Serialize};
use crate::achievement::AchievementRecord;
use crate::quest::QuestBoard;
use crate::quest::QuestInstance;
use crate::stats::{LevelProgress, UserStats};
use crate::xp::XpAction;

/// Something that happened to a user's progression.
///
/// Events are published after the state change they describe has been
/// persisted. Consumers react to them (animations, toasts) but never feed
/// state back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// XP was awarded
    XpGained(XpGained),

    /// One evaluation pass unlocked a batch of achievements
    AchievementsUnlocked {
        /// Newly unlocked achievements, in unlock order
        achievements: Vec<AchievementRecord>,
    },

    /// One progress update completed a batch of quests
    QuestsCompleted {
        /// Newly completed quests
        quests: Vec<QuestInstance>,
    },

    /// A session was initialized
    Initialized {
        /// State right after initialization
        snapshot: ProgressSnapshot,
    },
}

impl ProgressEvent {
    /// Event name, as used by subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::XpGained(_) => "xp_gained",
            ProgressEvent::AchievementsUnlocked { .. } => "achievements_unlocked",
            ProgressEvent::QuestsCompleted { .. } => "quests_completed",
            ProgressEvent::Initialized { .. } => "initialized",
        }
    }
}

/// Outcome of a single XP award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGained {
    /// XP added
    pub amount: u64,

    /// Action credited
    pub action: XpAction,

    /// Lifetime XP after the award
    pub total_xp: u64,

    /// XP within the level after the award
    pub current_xp: u64,

    /// Level after the award
    pub level: u32,

    /// Whether at least one level was gained
    pub leveled_up: bool,

    /// Level before the award
    pub previous_level: u32,

    /// Title after the award
    pub title: String,
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Progression state
    pub stats: UserStats,
    /// Achievement totals and list
    pub achievements: AchievementSummary,
    /// Active quests
    pub quests: QuestBoard,
    /// Progress within the current level
    pub level_progress: LevelProgress,
}

/// Achievement totals plus the full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementSummary {
    /// Achievements in the catalog
    pub total: usize,
    /// Achievements unlocked so far
    pub unlocked: usize,
    /// Every record, in catalog order
    pub list: Vec<AchievementRecord>,
}

impl AchievementSummary {
    /// Summarize a list of records.
    pub fn from_records(list: &[AchievementRecord]) -> Self {
        Self {
            total: list.len(),
            unlocked: list.iter().filter(|a| a.unlocked).count(),
            list: list.to_vec(),
        }
    }
}
