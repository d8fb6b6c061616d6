//! XP action catalog.

use serde::{Deserialize, Serialize};

/// An action that earns experience points.
///
/// Every action has a fixed base amount; callers may override it with an
/// explicit amount when awarding (achievement and quest rewards do).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum XpAction {
    // Application actions
    /// A job application was added
    ApplicationCreated,
    /// An application was edited
    ApplicationUpdated,
    /// An application was removed
    ApplicationDeleted,
    /// An application moved to another status
    ApplicationStatusChanged,

    // Interview actions
    /// An interview was scheduled
    InterviewScheduled,
    /// An interview took place
    InterviewCompleted,
    /// Notes were added to an interview
    InterviewNotesAdded,

    // Daily actions
    /// First login of a calendar day
    DailyLogin,
    /// Login on the day after the previous one
    StreakMaintained,
    /// The user profile was edited
    ProfileUpdated,

    // Quest completions
    /// Reward for claiming a daily quest
    QuestDailyCompleted,
    /// Reward for claiming a weekly quest
    QuestWeeklyCompleted,

    // Milestones
    /// First application milestone
    FirstApplication,
    /// Tenth application milestone
    TenthApplication,
    /// Fiftieth application milestone
    FiftyApplications,
    /// Hundredth application milestone
    HundredApplications,

    // Special actions
    /// Data was exported
    ExportData,
    /// Data was imported
    ImportData,
    /// Reward for unlocking an achievement
    AchievementUnlocked,
}

impl XpAction {
    /// Every action, in catalog order.
    pub const ALL: [XpAction; 19] = [
        XpAction::ApplicationCreated,
        XpAction::ApplicationUpdated,
        XpAction::ApplicationDeleted,
        XpAction::ApplicationStatusChanged,
        XpAction::InterviewScheduled,
        XpAction::InterviewCompleted,
        XpAction::InterviewNotesAdded,
        XpAction::DailyLogin,
        XpAction::StreakMaintained,
        XpAction::ProfileUpdated,
        XpAction::QuestDailyCompleted,
        XpAction::QuestWeeklyCompleted,
        XpAction::FirstApplication,
        XpAction::TenthApplication,
        XpAction::FiftyApplications,
        XpAction::HundredApplications,
        XpAction::ExportData,
        XpAction::ImportData,
        XpAction::AchievementUnlocked,
    ];

    /// Fixed XP amount for this action.
    pub fn base_xp(self) -> u64 {
        match self {
            XpAction::ApplicationCreated => 50,
            XpAction::ApplicationUpdated => 10,
            XpAction::ApplicationDeleted => 5,
            XpAction::ApplicationStatusChanged => 15,
            XpAction::InterviewScheduled => 75,
            XpAction::InterviewCompleted => 100,
            XpAction::InterviewNotesAdded => 20,
            XpAction::DailyLogin => 25,
            XpAction::StreakMaintained => 50,
            XpAction::ProfileUpdated => 30,
            XpAction::QuestDailyCompleted => 100,
            XpAction::QuestWeeklyCompleted => 500,
            XpAction::FirstApplication => 100,
            XpAction::TenthApplication => 250,
            XpAction::FiftyApplications => 1000,
            XpAction::HundredApplications => 2500,
            XpAction::ExportData => 15,
            XpAction::ImportData => 20,
            XpAction::AchievementUnlocked => 50,
        }
    }

    /// Stable keyword for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            XpAction::ApplicationCreated => "APPLICATION_CREATED",
            XpAction::ApplicationUpdated => "APPLICATION_UPDATED",
            XpAction::ApplicationDeleted => "APPLICATION_DELETED",
            XpAction::ApplicationStatusChanged => "APPLICATION_STATUS_CHANGED",
            XpAction::InterviewScheduled => "INTERVIEW_SCHEDULED",
            XpAction::InterviewCompleted => "INTERVIEW_COMPLETED",
            XpAction::InterviewNotesAdded => "INTERVIEW_NOTES_ADDED",
            XpAction::DailyLogin => "DAILY_LOGIN",
            XpAction::StreakMaintained => "STREAK_MAINTAINED",
            XpAction::ProfileUpdated => "PROFILE_UPDATED",
            XpAction::QuestDailyCompleted => "QUEST_DAILY_COMPLETED",
            XpAction::QuestWeeklyCompleted => "QUEST_WEEKLY_COMPLETED",
            XpAction::FirstApplication => "FIRST_APPLICATION",
            XpAction::TenthApplication => "TENTH_APPLICATION",
            XpAction::FiftyApplications => "FIFTY_APPLICATIONS",
            XpAction::HundredApplications => "HUNDRED_APPLICATIONS",
            XpAction::ExportData => "EXPORT_DATA",
            XpAction::ImportData => "IMPORT_DATA",
            XpAction::AchievementUnlocked => "ACHIEVEMENT_UNLOCKED",
        }
    }
}

impl std::fmt::Display for XpAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a keyword does not name a known action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown XP action: {0}")]
pub struct ParseActionError(pub String);

impl std::str::FromStr for XpAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        XpAction::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
