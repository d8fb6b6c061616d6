//! Storage trait abstraction.

use async_trait::async_trait;
use jobquest_core::{AchievementRecord, QuestBoard, UserId, UserStats};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend did not answer in time
    #[error("storage operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Durable storage of progression data, keyed by user.
///
/// Every call reads or writes one whole object; a failed save leaves the
/// previously stored object intact.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Stats ===

    /// Load a user's progression stats.
    async fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>>;

    /// Save progression stats (keyed by `stats.user_id`).
    async fn save_stats(&mut self, stats: &UserStats) -> Result<()>;

    // === Achievements ===

    /// Load a user's achievement list.
    async fn load_achievements(&self, user: &UserId) -> Result<Option<Vec<AchievementRecord>>>;

    /// Save a user's full achievement list.
    async fn save_achievements(
        &mut self,
        user: &UserId,
        achievements: &[AchievementRecord],
    ) -> Result<()>;

    // === Quests ===

    /// Load a user's quest board.
    async fn load_quests(&self, user: &UserId) -> Result<Option<QuestBoard>>;

    /// Save a user's quest board.
    async fn save_quests(&mut self, user: &UserId, quests: &QuestBoard) -> Result<()>;
}
