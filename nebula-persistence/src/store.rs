use anyhow::Result;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::repositories::{AchievementRepository, ProgressRepository, ScoreRepository};
use nebula_core::{ProgressStore, timestamp_now};
use nebula_types::{InfiniteScore, PlayerAchievements, PlayerProgress};

/// [`ProgressStore`] backed by the SQL database.
pub struct SqlProgressStore {
    progress: ProgressRepository,
    achievements: AchievementRepository,
    scores: ScoreRepository,
}

impl SqlProgressStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            progress: ProgressRepository::new(db.clone()),
            achievements: AchievementRepository::new(db.clone()),
            scores: ScoreRepository::new(db),
        }
    }
}

#[async_trait]
impl ProgressStore for SqlProgressStore {
    async fn get_progress(&self, player_id: &str) -> Result<Option<PlayerProgress>> {
        self.progress.find_by_player_id(player_id).await
    }

    async fn upsert_progress(
        &self,
        player_id: &str,
        mut progress: PlayerProgress,
    ) -> Result<PlayerProgress> {
        progress.updated_at = timestamp_now();
        self.progress.upsert(player_id, progress).await
    }

    async fn get_achievements(&self, player_id: &str) -> Result<Option<PlayerAchievements>> {
        self.achievements.find_by_player_id(player_id).await
    }

    async fn upsert_achievements(
        &self,
        player_id: &str,
        mut achievements: PlayerAchievements,
    ) -> Result<PlayerAchievements> {
        achievements.updated_at = timestamp_now();
        self.achievements.upsert(player_id, achievements).await
    }

    async fn append_score(&self, score: &InfiniteScore) -> Result<()> {
        self.scores.append(score).await
    }

    async fn top_scores(&self, limit: u64) -> Result<Vec<InfiniteScore>> {
        self.scores.top_scores(limit).await
    }
}
