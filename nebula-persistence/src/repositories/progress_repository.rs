use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::{player_progress, prelude::*};
use nebula_types::{LevelProgress, PlayerProgress as PlayerProgressRecord};

pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_progress(model: player_progress::Model) -> Result<PlayerProgressRecord> {
        let levels: Vec<LevelProgress> = serde_json::from_str(&model.levels)
            .with_context(|| format!("Corrupt level data for player {}", model.player_id))?;

        Ok(PlayerProgressRecord {
            player_id: model.player_id,
            current_level: model.current_level,
            total_score: model.total_score,
            total_stars: model.total_stars,
            infinite_high_score: model.infinite_high_score,
            infinite_high_wave: model.infinite_high_wave,
            levels,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub async fn find_by_player_id(&self, player_id: &str) -> Result<Option<PlayerProgressRecord>> {
        let model = PlayerProgress::find_by_id(player_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::model_to_progress).transpose()
    }

    /// Insert or fully replace the record stored under `player_id`.
    pub async fn upsert(
        &self,
        player_id: &str,
        progress: PlayerProgressRecord,
    ) -> Result<PlayerProgressRecord> {
        let levels = serde_json::to_string(&progress.levels)?;

        let model = player_progress::ActiveModel {
            player_id: ActiveValue::Set(player_id.to_string()),
            current_level: ActiveValue::Set(progress.current_level),
            total_score: ActiveValue::Set(progress.total_score),
            total_stars: ActiveValue::Set(progress.total_stars),
            infinite_high_score: ActiveValue::Set(progress.infinite_high_score),
            infinite_high_wave: ActiveValue::Set(progress.infinite_high_wave),
            levels: ActiveValue::Set(levels),
            created_at: ActiveValue::Set(progress.created_at),
            updated_at: ActiveValue::Set(progress.updated_at),
        };

        PlayerProgress::insert(model)
            .on_conflict(
                OnConflict::column(player_progress::Column::PlayerId)
                    .update_columns([
                        player_progress::Column::CurrentLevel,
                        player_progress::Column::TotalScore,
                        player_progress::Column::TotalStars,
                        player_progress::Column::InfiniteHighScore,
                        player_progress::Column::InfiniteHighWave,
                        player_progress::Column::Levels,
                        player_progress::Column::CreatedAt,
                        player_progress::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.find_by_player_id(player_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve progress for {}", player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use nebula_core::ProgressEngine;

    async fn setup_test_db() -> ProgressRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ProgressRepository::new(db)
    }

    #[tokio::test]
    async fn test_upsert_and_find_progress() {
        let repo = setup_test_db().await;
        let mut progress = ProgressEngine::new_progress("player-1");
        progress.levels[0].completed = true;
        progress.levels[0].stars = 3;
        progress.levels[0].last_played = Some("2025-01-01T00:00:00+00:00".to_string());

        let saved = repo.upsert("player-1", progress.clone()).await.unwrap();
        assert_eq!(saved, progress);

        let found = repo.find_by_player_id("player-1").await.unwrap().unwrap();
        assert_eq!(found, progress);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let repo = setup_test_db().await;
        let mut progress = ProgressEngine::new_progress("player-1");
        repo.upsert("player-1", progress.clone()).await.unwrap();

        progress.total_score = 4200;
        progress.infinite_high_wave = 9;
        repo.upsert("player-1", progress.clone()).await.unwrap();

        let found = repo.find_by_player_id("player-1").await.unwrap().unwrap();
        assert_eq!(found.total_score, 4200);
        assert_eq!(found.infinite_high_wave, 9);
    }

    #[tokio::test]
    async fn test_missing_player_is_none() {
        let repo = setup_test_db().await;
        assert!(repo.find_by_player_id("ghost").await.unwrap().is_none());
    }
}
