//! Quest model - time-boxed tasks with a target and a claimable reward.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use crate::Day;

/// How often a quest rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCadence {
    /// Replaced every calendar day
    Daily,
    /// Replaced every ISO week
    Weekly,
}

impl QuestCadence {
    /// Lowercase name, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestCadence::Daily => "daily",
            QuestCadence::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for QuestCadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ISO week a quest was generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    /// ISO week-numbering year
    pub year: i32,
    /// ISO week number (1-53)
    pub week: u32,
}

impl WeekKey {
    /// The ISO week containing `day`.
    pub fn of(day: Day) -> Self {
        let iso = day.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Static quest template.
#[derive(Debug, Clone, Copy)]
pub struct QuestTemplate {
    /// Stable identifier, shared by every instance
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What to do
    pub description: &'static str,
    /// Daily or weekly
    pub cadence: QuestCadence,
    /// XP awarded on claim
    pub xp_reward: u64,
    /// Progress needed to complete
    pub target: u32,
    /// Progress tag the quest listens to
    pub condition_tag: &'static str,
}

impl QuestTemplate {
    /// Fresh, unprogressed instance generated on `today`.
    pub fn instantiate(&self, today: Day) -> QuestInstance {
        QuestInstance {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            cadence: self.cadence,
            xp_reward: self.xp_reward,
            target: self.target,
            progress: 0,
            completed: false,
            claimed_reward: false,
            condition_tag: self.condition_tag.to_string(),
            generated_on: today,
            generated_week: WeekKey::of(today),
        }
    }
}

/// An active quest of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestInstance {
    /// Template identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// What it takes
    pub description: String,

    /// Rotation cadence
    pub cadence: QuestCadence,

    /// XP granted on claim
    pub xp_reward: u64,

    /// Units of progress needed
    pub target: u32,

    /// Units of progress made, never above `target`
    pub progress: u32,

    /// Whether `progress` reached `target`
    pub completed: bool,

    /// Whether the reward has been claimed
    pub claimed_reward: bool,

    /// Progress key this quest listens to
    pub condition_tag: String,

    /// Day this quest was generated
    pub generated_on: Day,

    /// ISO week this quest was generated in
    pub generated_week: WeekKey,
}

impl QuestInstance {
    /// Add progress, clamped at the target.
    ///
    /// Returns true only on the call that completes the quest. Completed
    /// quests ignore further progress.
    pub fn advance(&mut self, increment: u32) -> bool {
        if self.completed {
            return false;
        }
        self.progress = self.progress.saturating_add(increment).min(self.target);
        if self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }

    /// Whether the reward can be claimed now.
    pub fn is_claimable(&self) -> bool {
        self.completed && !self.claimed_reward
    }
}

/// Active quests of one user, by cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestBoard {
    /// Daily quests
    pub daily: Vec<QuestInstance>,

    /// Weekly quests
    pub weekly: Vec<QuestInstance>,
}

impl QuestBoard {
    /// Quests of one cadence.
    pub fn cadence(&self, cadence: QuestCadence) -> &[QuestInstance] {
        match cadence {
            QuestCadence::Daily => &self.daily,
            QuestCadence::Weekly => &self.weekly,
        }
    }

    /// Mutable quests of one cadence.
    pub fn cadence_mut(&mut self, cadence: QuestCadence) -> &mut Vec<QuestInstance> {
        match cadence {
            QuestCadence::Daily => &mut self.daily,
            QuestCadence::Weekly => &mut self.weekly,
        }
    }

    /// All quests, daily first.
    pub fn iter(&self) -> impl Iterator<Item = &QuestInstance> {
        self.daily.iter().chain(self.weekly.iter())
    }

    /// All quests mutably, daily first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut QuestInstance> {
        self.daily.iter_mut().chain(self.weekly.iter_mut())
    }

    /// Find a quest by template id in either cadence.
    pub fn find(&self, id: &str) -> Option<&QuestInstance> {
        self.iter().find(|q| q.id == id)
    }

    /// Find a quest by template id in either cadence, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut QuestInstance> {
        self.iter_mut().find(|q| q.id == id)
    }
}

/// The daily template pool.
pub fn daily_templates() -> Vec<QuestTemplate> {
    vec![
        QuestTemplate {
            id: "daily_application",
            name: "Daily Application",
            description: "Submit at least 1 job application today",
            cadence: QuestCadence::Daily,
            xp_reward: 100,
            target: 1,
            condition_tag: "applications_today",
        },
        QuestTemplate {
            id: "daily_update",
            name: "Status Update",
            description: "Update the status of 3 applications",
            cadence: QuestCadence::Daily,
            xp_reward: 75,
            target: 3,
            condition_tag: "status_updates_today",
        },
        QuestTemplate {
            id: "daily_notes",
            name: "Take Notes",
            description: "Add notes to 2 applications",
            cadence: QuestCadence::Daily,
            xp_reward: 50,
            target: 2,
            condition_tag: "notes_added_today",
        },
        QuestTemplate {
            id: "daily_checkin",
            name: "Check In",
            description: "Open your tracker today",
            cadence: QuestCadence::Daily,
            xp_reward: 25,
            target: 1,
            condition_tag: "logins_today",
        },
        QuestTemplate {
            id: "daily_interview",
            name: "Book It",
            description: "Schedule an interview today",
            cadence: QuestCadence::Daily,
            xp_reward: 120,
            target: 1,
            condition_tag: "interviews_scheduled_today",
        },
    ]
}

/// The weekly template pool.
pub fn weekly_templates() -> Vec<QuestTemplate> {
    vec![
        QuestTemplate {
            id: "weekly_applications",
            name: "Weekly Goal",
            description: "Submit 10 job applications this week",
            cadence: QuestCadence::Weekly,
            xp_reward: 500,
            target: 10,
            condition_tag: "applications_this_week",
        },
        QuestTemplate {
            id: "weekly_interviews",
            name: "Interview Week",
            description: "Schedule 3 interviews this week",
            cadence: QuestCadence::Weekly,
            xp_reward: 750,
            target: 3,
            condition_tag: "interviews_scheduled_this_week",
        },
        QuestTemplate {
            id: "weekly_streak",
            name: "Consistent Tracker",
            description: "Log in every day this week",
            cadence: QuestCadence::Weekly,
            xp_reward: 400,
            target: 7,
            condition_tag: "logins_this_week",
        },
        QuestTemplate {
            id: "weekly_status_updates",
            name: "Pipeline Keeper",
            description: "Update the status of 15 applications this week",
            cadence: QuestCadence::Weekly,
            xp_reward: 350,
            target: 15,
            condition_tag: "status_updates_this_week",
        },
        QuestTemplate {
            id: "weekly_interviews_completed",
            name: "Face Time",
            description: "Complete 2 interviews this week",
            cadence: QuestCadence::Weekly,
            xp_reward: 600,
            target: 2,
            condition_tag: "interviews_completed_this_week",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_clamps_and_completes_once() {
        let mut quest = daily_templates()[1].instantiate(day(2024, 5, 6));
        assert_eq!(quest.target, 3);

        assert!(!quest.advance(2));
        assert_eq!(quest.progress, 2);
        assert!(quest.advance(5));
        assert_eq!(quest.progress, 3);
        assert!(quest.completed);
        assert!(!quest.advance(1));
        assert_eq!(quest.progress, 3);
    }

    #[test]
    fn test_week_key_uses_iso_weeks() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025
        assert_eq!(WeekKey::of(day(2024, 12, 30)), WeekKey { year: 2025, week: 1 });
        assert_eq!(WeekKey::of(day(2024, 5, 6)), WeekKey::of(day(2024, 5, 12)));
        assert_ne!(WeekKey::of(day(2024, 5, 12)), WeekKey::of(day(2024, 5, 13)));
        assert_eq!(WeekKey { year: 2025, week: 1 }.to_string(), "2025-W01");
    }

    #[test]
    fn test_board_lookup_spans_cadences() {
        let today = day(2024, 5, 6);
        let board = QuestBoard {
            daily: vec![daily_templates()[0].instantiate(today)],
            weekly: vec![weekly_templates()[2].instantiate(today)],
        };
        assert_eq!(board.find("weekly_streak").map(|q| q.cadence), Some(QuestCadence::Weekly));
        assert!(board.find("daily_notes").is_none());
        assert_eq!(board.iter().count(), 2);
    }

    #[test]
    fn test_pools_are_larger_than_three_slots() {
        assert!(daily_templates().len() > 3);
        assert!(weekly_templates().len() > 3);
        assert!(daily_templates().iter().all(|t| t.target > 0));
        assert!(weekly_templates().iter().all(|t| t.cadence == QuestCadence::Weekly));
    }
}
