//! In-memory storage, for ephemeral sessions and tests.

use std::collections::HashMap;
use jobquest_core::{AchievementRecord, QuestBoard, UserId, UserStats};
use super::{Storage, Result};

/// Storage backend that keeps everything in process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    stats: HashMap<UserId, UserStats>,
    achievements: HashMap<UserId, Vec<AchievementRecord>>,
    quests: HashMap<UserId, QuestBoard>,
    writes: usize,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stats before a session starts.
    pub fn with_stats(mut self, stats: UserStats) -> Self {
        self.stats.insert(stats.user_id.clone(), stats);
        self
    }

    /// Seed a quest board before a session starts.
    pub fn with_quests(mut self, user: UserId, quests: QuestBoard) -> Self {
        self.quests.insert(user, quests);
        self
    }

    /// Seed an achievement list before a session starts.
    pub fn with_achievements(mut self, user: UserId, achievements: Vec<AchievementRecord>) -> Self {
        self.achievements.insert(user, achievements);
        self
    }

    /// Number of successful saves so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>> {
        Ok(self.stats.get(user).cloned())
    }

    async fn save_stats(&mut self, stats: &UserStats) -> Result<()> {
        self.stats.insert(stats.user_id.clone(), stats.clone());
        self.writes += 1;
        Ok(())
    }

    async fn load_achievements(&self, user: &UserId) -> Result<Option<Vec<AchievementRecord>>> {
        Ok(self.achievements.get(user).cloned())
    }

    async fn save_achievements(
        &mut self,
        user: &UserId,
        achievements: &[AchievementRecord],
    ) -> Result<()> {
        self.achievements.insert(user.clone(), achievements.to_vec());
        self.writes += 1;
        Ok(())
    }

    async fn load_quests(&self, user: &UserId) -> Result<Option<QuestBoard>> {
        Ok(self.quests.get(user).cloned())
    }

    async fn save_quests(&mut self, user: &UserId, quests: &QuestBoard) -> Result<()> {
        self.quests.insert(user.clone(), quests.clone());
        self.writes += 1;
        Ok(())
    }
}
