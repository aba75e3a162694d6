use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::timestamp_now;
use nebula_types::{InfiniteScore, PlayerAchievements, PlayerId, PlayerProgress};

/// Storage gateway for the three record kinds the engines work with.
///
/// Each upsert replaces the whole record atomically and stamps `updated_at`.
/// Nothing here serializes concurrent writers for the same player: racing
/// read-modify-write cycles resolve as last writer wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(&self, player_id: &str) -> Result<Option<PlayerProgress>>;

    async fn upsert_progress(
        &self,
        player_id: &str,
        progress: PlayerProgress,
    ) -> Result<PlayerProgress>;

    async fn get_achievements(&self, player_id: &str) -> Result<Option<PlayerAchievements>>;

    async fn upsert_achievements(
        &self,
        player_id: &str,
        achievements: PlayerAchievements,
    ) -> Result<PlayerAchievements>;

    /// Append an immutable score entry.
    async fn append_score(&self, score: &InfiniteScore) -> Result<()>;

    /// Highest scores first; equal scores keep insertion order.
    async fn top_scores(&self, limit: u64) -> Result<Vec<InfiniteScore>>;
}

/// Process-local store used by tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    progress: RwLock<HashMap<PlayerId, PlayerProgress>>,
    achievements: RwLock<HashMap<PlayerId, PlayerAchievements>>,
    scores: RwLock<Vec<InfiniteScore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_progress(&self, player_id: &str) -> Result<Option<PlayerProgress>> {
        Ok(self.progress.read().await.get(player_id).cloned())
    }

    async fn upsert_progress(
        &self,
        player_id: &str,
        mut progress: PlayerProgress,
    ) -> Result<PlayerProgress> {
        progress.updated_at = timestamp_now();
        self.progress
            .write()
            .await
            .insert(player_id.to_string(), progress.clone());
        Ok(progress)
    }

    async fn get_achievements(&self, player_id: &str) -> Result<Option<PlayerAchievements>> {
        Ok(self.achievements.read().await.get(player_id).cloned())
    }

    async fn upsert_achievements(
        &self,
        player_id: &str,
        mut achievements: PlayerAchievements,
    ) -> Result<PlayerAchievements> {
        achievements.updated_at = timestamp_now();
        self.achievements
            .write()
            .await
            .insert(player_id.to_string(), achievements.clone());
        Ok(achievements)
    }

    async fn append_score(&self, score: &InfiniteScore) -> Result<()> {
        self.scores.write().await.push(score.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: u64) -> Result<Vec<InfiniteScore>> {
        let mut scores = self.scores.read().await.clone();
        // sort_by is stable, so ties stay in insertion order
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(limit as usize);
        Ok(scores)
    }
}
