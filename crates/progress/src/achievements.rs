//! Achievement evaluation.

use jobquest_core::{
    default_achievements, AchievementDefinition, AchievementRecord, Time, UserStats,
};
use tracing::debug;

/// Evaluates an ordered achievement catalog against progression state.
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    catalog: Vec<AchievementDefinition>,
}

impl AchievementEvaluator {
    /// Evaluator over a custom catalog.
    pub fn new(catalog: Vec<AchievementDefinition>) -> Self {
        Self { catalog }
    }

    /// The catalog, in evaluation order.
    pub fn catalog(&self) -> &[AchievementDefinition] {
        &self.catalog
    }

    /// Locked records for every catalog entry.
    pub fn seed(&self) -> Vec<AchievementRecord> {
        self.catalog.iter().map(|d| d.to_record()).collect()
    }

    /// Append catalog entries that a persisted list does not know yet.
    ///
    /// Returns true if anything was added. Persisted records keep their
    /// unlock state and position.
    pub fn reconcile(&self, records: &mut Vec<AchievementRecord>) -> bool {
        let before = records.len();
        for def in &self.catalog {
            if !records.iter().any(|r| r.id == def.id) {
                debug!("Adding new achievement {}", def.id);
                records.push(def.to_record());
            }
        }
        records.len() != before
    }

    /// One evaluation pass.
    ///
    /// Every locked record whose condition holds is unlocked at `now`, in
    /// list order. Returns the newly unlocked records; already-unlocked
    /// records are never touched.
    pub fn evaluate(
        &self,
        stats: &UserStats,
        records: &mut [AchievementRecord],
        now: Time,
    ) -> Vec<AchievementRecord> {
        records
            .iter_mut()
            .filter(|r| !r.unlocked && r.condition.is_met(stats))
            .filter_map(|r| r.unlock(now).then(|| r.clone()))
            .collect()
    }
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self::new(default_achievements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobquest_core::UserId;

    fn stats() -> UserStats {
        UserStats::new(UserId::new("alice"), 100, "Job Seeker Novice")
    }

    #[test]
    fn test_seed_is_all_locked() {
        let evaluator = AchievementEvaluator::default();
        let records = evaluator.seed();
        assert_eq!(records.len(), evaluator.catalog().len());
        assert!(records.iter().all(|r| !r.unlocked && r.unlocked_at.is_none()));
    }

    #[test]
    fn test_nothing_unlocks_on_fresh_stats() {
        let evaluator = AchievementEvaluator::default();
        let mut records = evaluator.seed();
        // level 1 meets no level milestone; everything else starts at zero
        assert!(evaluator.evaluate(&stats(), &mut records, chrono::Utc::now()).is_empty());
    }

    #[test]
    fn test_unlocks_in_catalog_order_and_only_once() {
        let evaluator = AchievementEvaluator::default();
        let mut records = evaluator.seed();
        let mut s = stats();
        s.total_applications = 10;
        s.total_interviews = 1;

        let now = chrono::Utc::now();
        let unlocked = evaluator.evaluate(&s, &mut records, now);
        let ids: Vec<_> = unlocked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["first_application", "ten_applications", "first_interview"]);
        assert!(unlocked.iter().all(|r| r.unlocked_at == Some(now)));

        let again = evaluator.evaluate(&s, &mut records, now + chrono::Duration::seconds(1));
        assert!(again.is_empty());
        assert_eq!(records[0].unlocked_at, Some(now));
    }

    #[test]
    fn test_unlock_survives_stats_regression() {
        let evaluator = AchievementEvaluator::default();
        let mut records = evaluator.seed();
        let mut s = stats();
        s.current_streak = 7;
        evaluator.evaluate(&s, &mut records, chrono::Utc::now());

        s.current_streak = 1;
        evaluator.evaluate(&s, &mut records, chrono::Utc::now());
        let week = records.iter().find(|r| r.id == "week_streak").unwrap();
        assert!(week.unlocked);
    }

    #[test]
    fn test_reconcile_appends_missing_entries() {
        let evaluator = AchievementEvaluator::default();
        let mut records = evaluator.seed();
        records[0].unlock(chrono::Utc::now());
        records.truncate(3);

        assert!(evaluator.reconcile(&mut records));
        assert_eq!(records.len(), evaluator.catalog().len());
        assert!(records[0].unlocked);
        assert!(!evaluator.reconcile(&mut records));
    }
}
