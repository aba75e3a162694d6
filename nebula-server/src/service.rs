use std::sync::Arc;
use tracing::{info, warn};

use nebula_core::{
    AchievementEngine, CoreResult, GameplayEvent, InfiniteRunEndedEvent, LevelCatalog,
    LevelCompletedEvent, ProgressEngine, ProgressStore,
};
use nebula_types::{
    Achievement, InfiniteScore, InfiniteScoreRequest, Level, LevelCompleteRequest, LevelId,
    PlayerAchievements, PlayerProgress, ProgressUpdateRequest,
};

/// Result of a gameplay event together with the achievements it unlocked.
#[derive(Debug, Clone)]
pub struct EventOutcome<T> {
    pub result: T,
    pub unlocked: Vec<Achievement>,
}

/// Entry point for every API operation.
///
/// Gameplay events always go through the progress engine first and the
/// achievement engine second. Achievement evaluation is best effort: if it
/// fails the already persisted progress stands and the request still succeeds.
pub struct NebulaService {
    catalog: LevelCatalog,
    progress: ProgressEngine,
    achievements: AchievementEngine,
}

impl NebulaService {
    pub fn new(store: Arc<dyn ProgressStore>, catalog: LevelCatalog) -> Self {
        Self {
            catalog,
            progress: ProgressEngine::new(store.clone()),
            achievements: AchievementEngine::new(store),
        }
    }

    pub fn levels(&self) -> &[Level] {
        self.catalog.all()
    }

    pub fn level(&self, level_id: LevelId) -> CoreResult<&Level> {
        self.catalog.require(level_id)
    }

    pub async fn progress(&self, player_id: &str) -> CoreResult<PlayerProgress> {
        self.progress.get_or_create(player_id).await
    }

    pub async fn update_progress(
        &self,
        player_id: &str,
        update: ProgressUpdateRequest,
    ) -> CoreResult<PlayerProgress> {
        self.progress.apply_update(player_id, update).await
    }

    pub async fn complete_level(
        &self,
        player_id: &str,
        request: &LevelCompleteRequest,
    ) -> CoreResult<EventOutcome<PlayerProgress>> {
        let event = LevelCompletedEvent::from(request);
        let progress = self.progress.complete_level(player_id, &event).await?;

        let evaluation = self
            .achievements
            .evaluate_level_event(player_id, &progress, &event)
            .await;
        let unlocked = settle_evaluation(player_id, event.into(), evaluation);

        Ok(EventOutcome {
            result: progress,
            unlocked,
        })
    }

    pub async fn submit_infinite_score(
        &self,
        player_id: &str,
        request: &InfiniteScoreRequest,
    ) -> CoreResult<EventOutcome<InfiniteScore>> {
        let event = InfiniteRunEndedEvent::from(request);
        let entry = self.progress.record_infinite_score(player_id, &event).await?;

        let evaluation = self
            .achievements
            .evaluate_infinite_event(player_id, &event)
            .await;
        let unlocked = settle_evaluation(player_id, event.into(), evaluation);

        Ok(EventOutcome {
            result: entry,
            unlocked,
        })
    }

    pub async fn leaderboard(&self, limit: u64) -> CoreResult<Vec<InfiniteScore>> {
        self.progress.leaderboard(limit).await
    }

    pub async fn achievements(&self, player_id: &str) -> CoreResult<PlayerAchievements> {
        self.achievements.get_or_create(player_id).await
    }
}

fn settle_evaluation(
    player_id: &str,
    event: GameplayEvent,
    evaluation: CoreResult<Vec<Achievement>>,
) -> Vec<Achievement> {
    match evaluation {
        Ok(unlocked) => {
            if !unlocked.is_empty() {
                info!(
                    "{} for {} unlocked {} achievement(s)",
                    event.kind(),
                    player_id,
                    unlocked.len()
                );
            }
            unlocked
        }
        Err(err) => {
            warn!(
                "Achievement evaluation for {} after {} failed, progress kept: {}",
                player_id,
                event.kind(),
                err
            );
            Vec::new()
        }
    }
}
