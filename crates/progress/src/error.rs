//! Error types for the progression engine.

use jobquest_storage::StorageError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors returned by the progression engine.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// A session method was called before `initialize` (or after `dispose`)
    #[error("progression engine not initialized")]
    NotInitialized,

    /// A quest reward could not be claimed
    #[error("quest {quest_id} cannot be claimed: {reason}")]
    QuestClaim {
        /// Quest that was asked for
        quest_id: String,
        /// Why the claim was refused
        reason: ClaimRejection,
    },

    /// The storage backend failed. In-memory state is already ahead of
    /// storage when this is returned.
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),
}

/// Why a quest claim was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClaimRejection {
    /// No active quest has this id
    #[error("no active quest with this id")]
    NotFound,

    /// The quest target has not been reached
    #[error("quest is not completed")]
    NotCompleted,

    /// The reward was already claimed
    #[error("reward already claimed")]
    AlreadyClaimed,
}
