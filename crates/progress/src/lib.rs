//! Progression engine
//!
//! XP awards, levels, achievements, login streaks and quests for one user
//! session at a time.

#![warn(missing_docs)]

pub mod achievements;
pub mod clock;
pub mod engine;
pub mod error;
pub mod level;
pub mod notify;
pub mod quests;
pub mod streak;

pub use achievements::AchievementEvaluator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{
    ActivityReport, ApplicationActivity, AwardReport, EngineConfig, LoginReport, ProgressionEngine,
    QuestClaim,
};
pub use error::{ClaimRejection, ProgressError, Result};
pub use level::{LevelCalculator, LevelConfig, LEVEL_TITLES};
pub use notify::{BroadcastNotifier, NoopNotifier, Notifier};
pub use quests::{QuestProgress, QuestScheduler, DEFAULT_QUEST_SLOTS};
pub use streak::{LoginCheck, StreakTracker};
