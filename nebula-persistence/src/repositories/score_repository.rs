use anyhow::{Context, Result};
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::entities::{infinite_scores, prelude::*};
use nebula_types::InfiniteScore;

/// Append-only log of infinite-mode runs.
pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_score(model: infinite_scores::Model) -> Result<InfiniteScore> {
        let id = Uuid::parse_str(&model.id)
            .with_context(|| format!("Corrupt score id {}", model.id))?;

        Ok(InfiniteScore {
            id,
            player_id: model.player_id,
            score: model.score,
            wave: model.wave,
            timestamp: model.timestamp,
        })
    }

    pub async fn append(&self, score: &InfiniteScore) -> Result<()> {
        let model = infinite_scores::ActiveModel {
            seq: ActiveValue::NotSet,
            id: ActiveValue::Set(score.id.to_string()),
            player_id: ActiveValue::Set(score.player_id.clone()),
            score: ActiveValue::Set(score.score),
            wave: ActiveValue::Set(score.wave),
            timestamp: ActiveValue::Set(score.timestamp.clone()),
        };

        InfiniteScores::insert(model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn top_scores(&self, limit: u64) -> Result<Vec<InfiniteScore>> {
        let models = InfiniteScores::find()
            .order_by_desc(infinite_scores::Column::Score)
            .order_by_asc(infinite_scores::Column::Seq)
            .limit(limit)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::model_to_score).collect()
    }
}
