use nebula_types::{InfiniteScoreRequest, LevelCompleteRequest, LevelId};

/// A campaign level was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompletedEvent {
    pub level_id: LevelId,
    pub score: i32,
    pub stars: i32,
    /// Reported by the client but not consumed by any rule yet.
    pub shots: i32,
}

/// An infinite-mode run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfiniteRunEndedEvent {
    pub score: i32,
    pub wave: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayEvent {
    LevelCompleted(LevelCompletedEvent),
    InfiniteRunEnded(InfiniteRunEndedEvent),
}

impl GameplayEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameplayEvent::LevelCompleted(_) => "level_completed",
            GameplayEvent::InfiniteRunEnded(_) => "infinite_run_ended",
        }
    }
}

impl From<&LevelCompleteRequest> for LevelCompletedEvent {
    fn from(request: &LevelCompleteRequest) -> Self {
        Self {
            level_id: request.level_id,
            score: request.score,
            stars: request.stars,
            shots: request.shots,
        }
    }
}

impl From<&InfiniteScoreRequest> for InfiniteRunEndedEvent {
    fn from(request: &InfiniteScoreRequest) -> Self {
        Self {
            score: request.score,
            wave: request.wave,
        }
    }
}

impl From<LevelCompletedEvent> for GameplayEvent {
    fn from(event: LevelCompletedEvent) -> Self {
        GameplayEvent::LevelCompleted(event)
    }
}

impl From<InfiniteRunEndedEvent> for GameplayEvent {
    fn from(event: InfiniteRunEndedEvent) -> Self {
        GameplayEvent::InfiniteRunEnded(event)
    }
}
