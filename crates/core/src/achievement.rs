//! Achievement model - one-time milestones with a fixed XP reward.

use serde::{Deserialize, Serialize};
use crate::stats::UserStats;
use crate::Time;

/// Achievement grouping, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementCategory {
    /// Application counts
    Applications,
    /// Interview counts
    Interviews,
    /// Login streaks
    Streaks,
    /// Level milestones
    Milestones,
    /// Quests and other features
    Exploration,
    /// Sharing and community
    Social,
}

/// Unlock condition of an achievement.
///
/// Conditions are plain data so that achievement lists can be persisted and
/// compared; `is_met` is the only place they are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AchievementCondition {
    /// `total_applications >= n`
    TotalApplicationsAtLeast(u32),
    /// `total_interviews >= n`
    TotalInterviewsAtLeast(u32),
    /// `completed_interviews >= n`
    CompletedInterviewsAtLeast(u32),
    /// `current_streak >= n`
    StreakAtLeast(u32),
    /// `level >= n`
    LevelAtLeast(u32),
    /// `quests_completed >= n`
    QuestsCompletedAtLeast(u32),
}

impl AchievementCondition {
    /// Evaluate against a stats snapshot.
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match *self {
            AchievementCondition::TotalApplicationsAtLeast(n) => stats.total_applications >= n,
            AchievementCondition::TotalInterviewsAtLeast(n) => stats.total_interviews >= n,
            AchievementCondition::CompletedInterviewsAtLeast(n) => stats.completed_interviews >= n,
            AchievementCondition::StreakAtLeast(n) => stats.current_streak >= n,
            AchievementCondition::LevelAtLeast(n) => stats.level >= n,
            AchievementCondition::QuestsCompletedAtLeast(n) => stats.quests_completed >= n,
        }
    }
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    /// Stable identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What it takes to unlock
    pub description: &'static str,
    /// Display grouping
    pub category: AchievementCategory,
    /// XP awarded on unlock
    pub xp_reward: u64,
    /// Display icon
    pub icon: &'static str,
    /// Unlock condition
    pub condition: AchievementCondition,
}

impl AchievementDefinition {
    /// Locked per-user record for this definition.
    pub fn to_record(&self) -> AchievementRecord {
        AchievementRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            xp_reward: self.xp_reward,
            icon: self.icon.to_string(),
            condition: self.condition,
            unlocked: false,
            unlocked_at: None,
        }
    }
}

/// A user's copy of an achievement, with its unlock state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// What it takes
    pub description: String,

    /// Grouping
    pub category: AchievementCategory,

    /// XP granted on unlock
    pub xp_reward: u64,

    /// Display icon
    pub icon: String,

    /// Unlock condition
    pub condition: AchievementCondition,

    /// Whether it has been unlocked. Never goes back to false.
    pub unlocked: bool,

    /// When it was unlocked
    pub unlocked_at: Option<Time>,
}

impl AchievementRecord {
    /// Unlock the record at `now`. Returns false if it was already unlocked.
    pub fn unlock(&mut self, now: Time) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlocked_at = Some(now);
        true
    }
}

/// The built-in achievement catalog, in evaluation order.
pub fn default_achievements() -> Vec<AchievementDefinition> {
    use AchievementCategory::*;
    use AchievementCondition::*;

    vec![
        AchievementDefinition {
            id: "first_application",
            name: "First Steps",
            description: "Submit your first job application",
            category: Applications,
            xp_reward: 100,
            icon: "🎯",
            condition: TotalApplicationsAtLeast(1),
        },
        AchievementDefinition {
            id: "ten_applications",
            name: "Getting Serious",
            description: "Submit 10 job applications",
            category: Applications,
            xp_reward: 250,
            icon: "📋",
            condition: TotalApplicationsAtLeast(10),
        },
        AchievementDefinition {
            id: "fifty_applications",
            name: "Application Machine",
            description: "Submit 50 job applications",
            category: Applications,
            xp_reward: 1000,
            icon: "🚀",
            condition: TotalApplicationsAtLeast(50),
        },
        AchievementDefinition {
            id: "hundred_applications",
            name: "Century Club",
            description: "Submit 100 job applications",
            category: Applications,
            xp_reward: 2500,
            icon: "💯",
            condition: TotalApplicationsAtLeast(100),
        },
        AchievementDefinition {
            id: "first_interview",
            name: "Interview Ready",
            description: "Schedule your first interview",
            category: Interviews,
            xp_reward: 150,
            icon: "🎤",
            condition: TotalInterviewsAtLeast(1),
        },
        AchievementDefinition {
            id: "five_interviews",
            name: "Interview Pro",
            description: "Complete 5 interviews",
            category: Interviews,
            xp_reward: 500,
            icon: "💼",
            condition: CompletedInterviewsAtLeast(5),
        },
        AchievementDefinition {
            id: "week_streak",
            name: "Week Warrior",
            description: "Maintain a 7-day login streak",
            category: Streaks,
            xp_reward: 300,
            icon: "🔥",
            condition: StreakAtLeast(7),
        },
        AchievementDefinition {
            id: "month_streak",
            name: "Monthly Master",
            description: "Maintain a 30-day login streak",
            category: Streaks,
            xp_reward: 1500,
            icon: "⚡",
            condition: StreakAtLeast(30),
        },
        AchievementDefinition {
            id: "level_10",
            name: "Double Digits",
            description: "Reach level 10",
            category: Milestones,
            xp_reward: 200,
            icon: "🎖️",
            condition: LevelAtLeast(10),
        },
        AchievementDefinition {
            id: "level_25",
            name: "Quarter Century",
            description: "Reach level 25",
            category: Milestones,
            xp_reward: 750,
            icon: "🏆",
            condition: LevelAtLeast(25),
        },
        AchievementDefinition {
            id: "level_50",
            name: "Halfway Hero",
            description: "Reach level 50",
            category: Milestones,
            xp_reward: 2000,
            icon: "👑",
            condition: LevelAtLeast(50),
        },
        AchievementDefinition {
            id: "first_quest",
            name: "Quest Accepted",
            description: "Claim your first quest reward",
            category: Exploration,
            xp_reward: 150,
            icon: "🗺️",
            condition: QuestsCompletedAtLeast(1),
        },
        AchievementDefinition {
            id: "ten_quests",
            name: "Seasoned Adventurer",
            description: "Claim 10 quest rewards",
            category: Exploration,
            xp_reward: 600,
            icon: "🧭",
            condition: QuestsCompletedAtLeast(10),
        },
    ]
}
