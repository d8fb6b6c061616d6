//! Per-user progression state.

use serde::{Deserialize, Serialize};
use crate::id::UserId;
use crate::Day;

/// Progression state of one user.
///
/// `level` and `current_xp` are derived from `total_xp`; the engine keeps
/// them in sync on every award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Owner of this state
    pub user_id: UserId,

    /// Current level (1-based)
    pub level: u32,

    /// XP earned since the start of the current level
    pub current_xp: u64,

    /// Lifetime XP
    pub total_xp: u64,

    /// XP span of the current level
    pub next_level_xp: u64,

    /// Consecutive login days, including today
    pub current_streak: u32,

    /// Best streak ever reached
    pub longest_streak: u32,

    /// Last calendar day a login was counted
    #[serde(default)]
    pub last_login_date: Option<Day>,

    /// Applications created
    pub total_applications: u32,

    /// Interviews scheduled
    pub total_interviews: u32,

    /// Interviews completed
    pub completed_interviews: u32,

    /// Achievements unlocked so far
    pub achievements_unlocked: u32,

    /// Quest rewards claimed so far
    pub quests_completed: u32,

    /// Cosmetic title for the current level
    pub title: String,
}

impl UserStats {
    /// Fresh level-1 state. No login has been recorded yet.
    pub fn new(user_id: UserId, next_level_xp: u64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            level: 1,
            current_xp: 0,
            total_xp: 0,
            next_level_xp,
            current_streak: 0,
            longest_streak: 0,
            last_login_date: None,
            total_applications: 0,
            total_interviews: 0,
            completed_interviews: 0,
            achievements_unlocked: 0,
            quests_completed: 0,
            title: title.into(),
        }
    }

    /// Progress through the current level.
    pub fn level_progress(&self) -> LevelProgress {
        let percentage = if self.next_level_xp > 0 {
            (self.current_xp as f64 / self.next_level_xp as f64) * 100.0
        } else {
            0.0
        };

        LevelProgress {
            current: self.current_xp,
            required: self.next_level_xp,
            percentage,
        }
    }
}

/// How far a user is through their current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// XP earned within the level
    pub current: u64,

    /// XP the level spans
    pub required: u64,

    /// `current / required`, as a percentage
    pub percentage: f64,
}
