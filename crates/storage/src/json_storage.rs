//! JSON file storage implementation.
//!
//! Stores each user's data as JSON files under `users/<user>/` and keeps a
//! small meta marker (version + updated_at) per object. Writes go to a
//! temporary file first and are renamed into place, so a reader never sees
//! a half-written object.

use std::path::{Path, PathBuf};
use std::time::Duration;
use jobquest_core::{AchievementRecord, QuestBoard, UserId, UserStats};
use serde::{de::DeserializeOwned, Serialize};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::debug;

const STATS: &str = "stats";
const ACHIEVEMENTS: &str = "achievements";
const QUESTS: &str = "quests";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    timeout: Duration,
}

impl JsonStorage {
    /// Default bound on a single file operation.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create storage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users")).await?;

        Ok(Self {
            root,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Bound every file operation by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user: &UserId) -> PathBuf {
        self.root.join("users").join(sanitize(user.as_str()))
    }

    fn object_path(&self, user: &UserId, kind: &str) -> PathBuf {
        self.user_dir(user).join(format!("{}.json", kind))
    }

    fn meta_path(&self, user: &UserId, kind: &str) -> PathBuf {
        self.user_dir(user).join("meta").join(format!("{}.meta.json", kind))
    }

    async fn read<T: DeserializeOwned>(&self, user: &UserId, kind: &str) -> Result<Option<T>> {
        let path = self.object_path(user, kind);
        self.timed(read_json(&path)).await
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        user: &UserId,
        kind: &str,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let path = self.object_path(user, kind);
        self.timed(async {
            fs::create_dir_all(self.user_dir(user).join("meta")).await?;
            write_atomic(&path, json.as_bytes()).await?;
            let version = self.bump_version(user, kind).await?;
            debug!("Saved {} for {} (v{})", kind, user, version);
            Ok::<(), StorageError>(())
        })
        .await
    }

    async fn timed<T, F>(&self, op: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.timeout)),
        }
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, user: &UserId, kind: &str) -> Result<u64> {
        let path = self.meta_path(user, kind);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        write_atomic(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>> {
        self.read(user, STATS).await
    }

    async fn save_stats(&mut self, stats: &UserStats) -> Result<()> {
        self.write(&stats.user_id, STATS, stats).await
    }

    async fn load_achievements(&self, user: &UserId) -> Result<Option<Vec<AchievementRecord>>> {
        self.read(user, ACHIEVEMENTS).await
    }

    async fn save_achievements(
        &mut self,
        user: &UserId,
        achievements: &[AchievementRecord],
    ) -> Result<()> {
        self.write(user, ACHIEVEMENTS, achievements).await
    }

    async fn load_quests(&self, user: &UserId) -> Result<Option<QuestBoard>> {
        self.read(user, QUESTS).await
    }

    async fn save_quests(&mut self, user: &UserId, quests: &QuestBoard) -> Result<()> {
        self.write(user, QUESTS, quests).await
    }
}

/// Map a user id to a safe directory name.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
