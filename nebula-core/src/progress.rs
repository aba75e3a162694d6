use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    CoreResult, InfiniteRunEndedEvent, LEVEL_COUNT, LevelCompletedEvent, ProgressStore,
    timestamp_now,
};
use nebula_types::{InfiniteScore, LevelId, LevelProgress, PlayerProgress, ProgressUpdateRequest};

/// Levels open to a brand new player.
pub const INITIAL_UNLOCKED_LEVELS: LevelId = 3;

/// Owns every mutation of [`PlayerProgress`] records.
pub struct ProgressEngine {
    store: Arc<dyn ProgressStore>,
}

impl ProgressEngine {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Build (without persisting) the record a new player starts with.
    pub fn new_progress(player_id: &str) -> PlayerProgress {
        let now = timestamp_now();
        let levels = (1..=LEVEL_COUNT as LevelId)
            .map(|id| LevelProgress::new(id, id <= INITIAL_UNLOCKED_LEVELS))
            .collect();

        PlayerProgress {
            player_id: player_id.to_string(),
            current_level: 1,
            total_score: 0,
            total_stars: 0,
            infinite_high_score: 0,
            infinite_high_wave: 0,
            levels,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Create and persist a fresh progress record.
    pub async fn initialize(&self, player_id: &str) -> CoreResult<PlayerProgress> {
        info!("Creating progress record for player {}", player_id);
        let progress = Self::new_progress(player_id);
        Ok(self.store.upsert_progress(player_id, progress).await?)
    }

    /// Load the player's progress, creating it on first access.
    ///
    /// Not a pure read: an unknown player gets a record written to the store.
    pub async fn get_or_create(&self, player_id: &str) -> CoreResult<PlayerProgress> {
        match self.store.get_progress(player_id).await? {
            Some(progress) => Ok(progress),
            None => self.initialize(player_id).await,
        }
    }

    pub async fn complete_level(
        &self,
        player_id: &str,
        event: &LevelCompletedEvent,
    ) -> CoreResult<PlayerProgress> {
        let mut progress = self.get_or_create(player_id).await?;

        if !apply_level_completion(&mut progress, event, &timestamp_now()) {
            warn!(
                "Player {} completed unknown level {}, progress left unchanged",
                player_id, event.level_id
            );
            return Ok(progress);
        }

        debug!(
            "Player {} completed level {} (score {}, stars {}, total stars {})",
            player_id, event.level_id, event.score, event.stars, progress.total_stars
        );
        Ok(self.store.upsert_progress(player_id, progress).await?)
    }

    /// Overwrite whichever fields the client sent.
    ///
    /// The caller is trusted: no range checks and no monotonicity guarantees,
    /// so a client snapshot can lower scores or drop levels.
    pub async fn apply_update(
        &self,
        player_id: &str,
        update: ProgressUpdateRequest,
    ) -> CoreResult<PlayerProgress> {
        let mut progress = self.get_or_create(player_id).await?;
        apply_progress_update(&mut progress, update);
        Ok(self.store.upsert_progress(player_id, progress).await?)
    }

    /// Log the run, then raise the player's infinite-mode records.
    pub async fn record_infinite_score(
        &self,
        player_id: &str,
        event: &InfiniteRunEndedEvent,
    ) -> CoreResult<InfiniteScore> {
        let entry = InfiniteScore {
            id: Uuid::new_v4(),
            player_id: player_id.to_string(),
            score: event.score,
            wave: event.wave,
            timestamp: timestamp_now(),
        };
        self.store.append_score(&entry).await?;

        let mut progress = self.get_or_create(player_id).await?;
        apply_infinite_run(&mut progress, event);
        self.store.upsert_progress(player_id, progress).await?;

        debug!(
            "Recorded infinite run for {}: score {}, wave {}",
            player_id, entry.score, entry.wave
        );
        Ok(entry)
    }

    pub async fn leaderboard(&self, limit: u64) -> CoreResult<Vec<InfiniteScore>> {
        Ok(self.store.top_scores(limit).await?)
    }
}

/// Apply a level completion in place. Returns `false`, leaving the record
/// untouched, when the level id does not exist.
pub fn apply_level_completion(
    progress: &mut PlayerProgress,
    event: &LevelCompletedEvent,
    now: &str,
) -> bool {
    let Some(level) = progress.level_mut(event.level_id) else {
        return false;
    };

    level.completed = true;
    level.stars = level.stars.max(event.stars);
    level.best_score = level.best_score.max(event.score);
    level.last_played = Some(now.to_string());

    if event.level_id < LEVEL_COUNT as LevelId
        && let Some(next) = progress.level_mut(event.level_id + 1)
    {
        next.unlocked = true;
    }

    // Every completion counts, replays included.
    progress.total_score = progress.total_score.saturating_add(event.score);
    progress.total_stars = progress.levels.iter().map(|level| level.stars).sum();
    progress.current_level = progress.current_level.max(event.level_id + 1);
    true
}

pub fn apply_progress_update(progress: &mut PlayerProgress, update: ProgressUpdateRequest) {
    if let Some(current_level) = update.current_level {
        progress.current_level = current_level;
    }
    if let Some(total_score) = update.total_score {
        progress.total_score = total_score;
    }
    if let Some(total_stars) = update.total_stars {
        progress.total_stars = total_stars;
    }
    if let Some(levels) = update.levels {
        progress.levels = levels;
    }
}

pub fn apply_infinite_run(progress: &mut PlayerProgress, event: &InfiniteRunEndedEvent) {
    progress.infinite_high_score = progress.infinite_high_score.max(event.score);
    progress.infinite_high_wave = progress.infinite_high_wave.max(event.wave);
}
