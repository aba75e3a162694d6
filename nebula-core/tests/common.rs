#![allow(dead_code)]

use nebula_core::{
    AchievementEngine, InfiniteRunEndedEvent, LevelCompletedEvent, MemoryStore, ProgressEngine,
    ProgressStore,
};
use nebula_types::LevelId;
use std::sync::Arc;

/// Both engines wired to one shared in-memory store.
pub struct TestEngines {
    pub store: Arc<MemoryStore>,
    pub progress: ProgressEngine,
    pub achievements: AchievementEngine,
}

impl TestEngines {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn ProgressStore> = store.clone();

        Self {
            progress: ProgressEngine::new(shared.clone()),
            achievements: AchievementEngine::new(shared),
            store,
        }
    }
}

/// Creates a level completion with an arbitrary shot count
pub fn level_completed(level_id: LevelId, score: i32, stars: i32) -> LevelCompletedEvent {
    LevelCompletedEvent {
        level_id,
        score,
        stars,
        shots: 10,
    }
}

pub fn run_ended(score: i32, wave: i32) -> InfiniteRunEndedEvent {
    InfiniteRunEndedEvent { score, wave }
}

/// Completes levels 1..=count in order with the given stars each
pub async fn complete_levels(engines: &TestEngines, player_id: &str, count: LevelId, stars: i32) {
    for level_id in 1..=count {
        engines
            .progress
            .complete_level(player_id, &level_completed(level_id, 1000, stars))
            .await
            .unwrap();
    }
}
