//! Quest generation, rotation and progress.

use jobquest_core::{
    daily_templates, weekly_templates, Day, QuestBoard, QuestCadence, QuestInstance, QuestTemplate,
    WeekKey,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use crate::error::ClaimRejection;

/// Default number of concurrently active quests per cadence.
pub const DEFAULT_QUEST_SLOTS: usize = 3;

/// Result of feeding one progress tag to a quest board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestProgress {
    /// Quests whose progress moved or that completed
    pub advanced: usize,
    /// Quests that reached their target on this update
    pub completed: Vec<QuestInstance>,
}

impl QuestProgress {
    fn merge(&mut self, other: QuestProgress) {
        self.advanced += other.advanced;
        self.completed.extend(other.completed);
    }
}

/// Draws daily and weekly quests from template pools.
#[derive(Debug, Clone)]
pub struct QuestScheduler {
    daily_pool: Vec<QuestTemplate>,
    weekly_pool: Vec<QuestTemplate>,
    slots: usize,
}

impl QuestScheduler {
    /// Scheduler over custom pools.
    pub fn new(daily_pool: Vec<QuestTemplate>, weekly_pool: Vec<QuestTemplate>) -> Self {
        Self {
            daily_pool,
            weekly_pool,
            slots: DEFAULT_QUEST_SLOTS,
        }
    }

    /// Set the number of active quests per cadence.
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }

    /// Active quests per cadence.
    pub fn slots(&self) -> usize {
        self.slots
    }

    fn pool(&self, cadence: QuestCadence) -> &[QuestTemplate] {
        match cadence {
            QuestCadence::Daily => &self.daily_pool,
            QuestCadence::Weekly => &self.weekly_pool,
        }
    }

    /// Draw a fresh set of quests for one cadence, without repetition.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        cadence: QuestCadence,
        today: Day,
        rng: &mut R,
    ) -> Vec<QuestInstance> {
        self.pool(cadence)
            .choose_multiple(rng, self.slots)
            .map(|t| t.instantiate(today))
            .collect()
    }

    /// Whether a cadence's quests belong to an earlier period than `today`.
    pub fn is_stale(cadence: QuestCadence, quests: &[QuestInstance], today: Day) -> bool {
        if quests.is_empty() {
            return true;
        }
        match cadence {
            QuestCadence::Daily => quests.iter().any(|q| q.generated_on != today),
            QuestCadence::Weekly => {
                let week = WeekKey::of(today);
                quests.iter().any(|q| q.generated_week != week)
            }
        }
    }

    /// Regenerate every stale cadence of `board`.
    ///
    /// Stale quests are discarded with their progress, including completed
    /// quests whose reward was never claimed. Returns the regenerated
    /// cadences.
    pub fn refresh<R: Rng + ?Sized>(
        &self,
        board: &mut QuestBoard,
        today: Day,
        rng: &mut R,
    ) -> Vec<QuestCadence> {
        let mut regenerated = Vec::new();
        for cadence in [QuestCadence::Daily, QuestCadence::Weekly] {
            if !Self::is_stale(cadence, board.cadence(cadence), today) {
                continue;
            }
            let unclaimed = board
                .cadence(cadence)
                .iter()
                .filter(|q| q.is_claimable())
                .count();
            let fresh = self.generate(cadence, today, rng);
            info!(
                "Generated {} {} quests for {} (discarded {} unclaimed)",
                fresh.len(),
                cadence,
                today,
                unclaimed
            );
            *board.cadence_mut(cadence) = fresh;
            regenerated.push(cadence);
        }
        regenerated
    }

    /// Feed `increment` units of progress to every open quest listening to
    /// `tag`, in either cadence. Progress is clamped at the target.
    pub fn update_progress(board: &mut QuestBoard, tag: &str, increment: u32) -> QuestProgress {
        let mut result = QuestProgress::default();
        for quest in board.iter_mut() {
            if quest.completed || quest.condition_tag != tag {
                continue;
            }
            let before = quest.progress;
            let completed = quest.advance(increment);
            // A zero-target quest completes without its progress moving
            if completed || quest.progress != before {
                result.advanced += 1;
            }
            if completed {
                result.completed.push(quest.clone());
            }
        }
        result
    }

    /// Feed several tags at once, merging the results.
    pub fn update_many(board: &mut QuestBoard, tags: &[&str], increment: u32) -> QuestProgress {
        let mut result = QuestProgress::default();
        for tag in tags {
            result.merge(Self::update_progress(board, tag, increment));
        }
        result
    }

    /// Mark a completed quest's reward as claimed.
    ///
    /// Returns a copy of the claimed quest.
    pub fn claim(board: &mut QuestBoard, quest_id: &str) -> Result<QuestInstance, ClaimRejection> {
        let quest = board.find_mut(quest_id).ok_or(ClaimRejection::NotFound)?;
        if !quest.completed {
            return Err(ClaimRejection::NotCompleted);
        }
        if quest.claimed_reward {
            return Err(ClaimRejection::AlreadyClaimed);
        }
        quest.claimed_reward = true;
        Ok(quest.clone())
    }
}

impl Default for QuestScheduler {
    fn default() -> Self {
        Self::new(daily_templates(), weekly_templates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd_opt(y, m, d).unwrap()
    }

    fn board_on(today: Day) -> QuestBoard {
        QuestBoard {
            daily: daily_templates()[..3].iter().map(|t| t.instantiate(today)).collect(),
            weekly: weekly_templates()[..3].iter().map(|t| t.instantiate(today)).collect(),
        }
    }

    #[test]
    fn test_generate_draws_without_repetition() {
        let scheduler = QuestScheduler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let today = day(2024, 5, 6);

        for _ in 0..20 {
            let quests = scheduler.generate(QuestCadence::Daily, today, &mut rng);
            assert_eq!(quests.len(), 3);
            let ids: HashSet<_> = quests.iter().map(|q| q.id.clone()).collect();
            assert_eq!(ids.len(), 3);
            assert!(quests.iter().all(|q| q.generated_on == today && q.progress == 0));
        }
    }

    #[test]
    fn test_generate_with_more_slots_than_templates() {
        let scheduler = QuestScheduler::default().with_slots(50);
        let mut rng = StdRng::seed_from_u64(1);
        let quests = scheduler.generate(QuestCadence::Weekly, day(2024, 5, 6), &mut rng);
        assert_eq!(quests.len(), weekly_templates().len());
    }

    #[test]
    fn test_refresh_empty_board_generates_both() {
        let scheduler = QuestScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = QuestBoard::default();

        let regenerated = scheduler.refresh(&mut board, day(2024, 5, 6), &mut rng);
        assert_eq!(regenerated, vec![QuestCadence::Daily, QuestCadence::Weekly]);
        assert_eq!(board.daily.len(), 3);
        assert_eq!(board.weekly.len(), 3);
    }

    #[test]
    fn test_refresh_same_day_keeps_board() {
        let scheduler = QuestScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        let today = day(2024, 5, 8);
        let mut board = board_on(today);
        board.daily[0].progress = 1;

        assert!(scheduler.refresh(&mut board, today, &mut rng).is_empty());
        assert_eq!(board.daily[0].progress, 1);
    }

    #[test]
    fn test_daily_rollover_within_week_keeps_weekly() {
        let scheduler = QuestScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        // Tuesday -> Wednesday, same ISO week
        let mut board = board_on(day(2024, 5, 7));
        board.weekly[0].progress = 4;
        board.daily[0].advance(1);

        let regenerated = scheduler.refresh(&mut board, day(2024, 5, 8), &mut rng);
        assert_eq!(regenerated, vec![QuestCadence::Daily]);
        assert_eq!(board.weekly[0].progress, 4);
        assert!(board.daily.iter().all(|q| !q.completed && q.generated_on == day(2024, 5, 8)));
    }

    #[test]
    fn test_week_rollover_regenerates_weekly() {
        let scheduler = QuestScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        // Sunday -> Monday crosses an ISO week
        let mut board = board_on(day(2024, 5, 12));

        let regenerated = scheduler.refresh(&mut board, day(2024, 5, 13), &mut rng);
        assert_eq!(regenerated, vec![QuestCadence::Daily, QuestCadence::Weekly]);
        assert!(board.weekly.iter().all(|q| q.generated_week == WeekKey::of(day(2024, 5, 13))));
    }

    #[test]
    fn test_progress_is_clamped_and_reports_completion_once() {
        let mut board = board_on(day(2024, 5, 6));

        let first = QuestScheduler::update_progress(&mut board, "status_updates_today", 2);
        assert_eq!(first.advanced, 1);
        assert!(first.completed.is_empty());

        let second = QuestScheduler::update_progress(&mut board, "status_updates_today", 10);
        assert_eq!(second.completed.len(), 1);
        assert_eq!(second.completed[0].progress, 3);

        let third = QuestScheduler::update_progress(&mut board, "status_updates_today", 1);
        assert_eq!(third, QuestProgress::default());
        assert!(board.iter().all(|q| q.progress <= q.target));
    }

    #[test]
    fn test_progress_spans_cadences() {
        let mut board = board_on(day(2024, 5, 6));
        let result = QuestScheduler::update_many(
            &mut board,
            &["applications_today", "applications_this_week"],
            1,
        );
        assert_eq!(result.advanced, 2);
        assert_eq!(result.completed.len(), 1);
        assert_eq!(result.completed[0].id, "daily_application");
        assert_eq!(board.find("weekly_applications").unwrap().progress, 1);
    }

    #[test]
    fn test_unknown_tag_changes_nothing() {
        let mut board = board_on(day(2024, 5, 6));
        let before = board.clone();
        assert_eq!(QuestScheduler::update_progress(&mut board, "nope", 3).advanced, 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_zero_target_completion_counts_as_advance() {
        let template = QuestTemplate {
            id: "daily_free",
            name: "Freebie",
            description: "Already done",
            cadence: QuestCadence::Daily,
            xp_reward: 10,
            target: 0,
            condition_tag: "applications_today",
        };
        let mut board = QuestBoard {
            daily: vec![template.instantiate(day(2024, 5, 6))],
            weekly: Vec::new(),
        };

        let result = QuestScheduler::update_progress(&mut board, "applications_today", 1);
        assert_eq!(result.advanced, 1);
        assert_eq!(result.completed.len(), 1);
        assert!(board.daily[0].completed);
    }

    #[test]
    fn test_claim_rules() {
        let mut board = board_on(day(2024, 5, 6));

        assert_eq!(QuestScheduler::claim(&mut board, "missing"), Err(ClaimRejection::NotFound));
        assert_eq!(
            QuestScheduler::claim(&mut board, "daily_notes"),
            Err(ClaimRejection::NotCompleted)
        );

        QuestScheduler::update_progress(&mut board, "notes_added_today", 2);
        let claimed = QuestScheduler::claim(&mut board, "daily_notes").unwrap();
        assert!(claimed.claimed_reward);
        assert_eq!(
            QuestScheduler::claim(&mut board, "daily_notes"),
            Err(ClaimRejection::AlreadyClaimed)
        );
    }
}
