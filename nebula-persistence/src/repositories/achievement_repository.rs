use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::{player_achievements, prelude::*};
use nebula_types::{Achievement, PlayerAchievements as PlayerAchievementsRecord};

pub struct AchievementRepository {
    db: DatabaseConnection,
}

impl AchievementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_achievements(
        model: player_achievements::Model,
    ) -> Result<PlayerAchievementsRecord> {
        let achievements: Vec<Achievement> = serde_json::from_str(&model.achievements)
            .with_context(|| format!("Corrupt achievement data for player {}", model.player_id))?;

        Ok(PlayerAchievementsRecord {
            player_id: model.player_id,
            achievements,
            updated_at: model.updated_at,
        })
    }

    pub async fn find_by_player_id(
        &self,
        player_id: &str,
    ) -> Result<Option<PlayerAchievementsRecord>> {
        let model = PlayerAchievements::find_by_id(player_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::model_to_achievements).transpose()
    }

    pub async fn upsert(
        &self,
        player_id: &str,
        record: PlayerAchievementsRecord,
    ) -> Result<PlayerAchievementsRecord> {
        let achievements = serde_json::to_string(&record.achievements)?;

        let model = player_achievements::ActiveModel {
            player_id: ActiveValue::Set(player_id.to_string()),
            achievements: ActiveValue::Set(achievements),
            updated_at: ActiveValue::Set(record.updated_at),
        };

        PlayerAchievements::insert(model)
            .on_conflict(
                OnConflict::column(player_achievements::Column::PlayerId)
                    .update_columns([
                        player_achievements::Column::Achievements,
                        player_achievements::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.find_by_player_id(player_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve achievements for {}", player_id))
    }
}
