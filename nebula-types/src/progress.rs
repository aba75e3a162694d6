use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{LevelId, PlayerId};

/// Per-player state of a single campaign level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LevelProgress {
    pub id: LevelId,
    pub unlocked: bool,
    pub completed: bool,
    pub stars: i32,
    pub best_score: i32,
    pub last_played: Option<String>, // ISO 8601 string
}

impl LevelProgress {
    pub fn new(id: LevelId, unlocked: bool) -> Self {
        Self {
            id,
            unlocked,
            completed: false,
            stars: 0,
            best_score: 0,
            last_played: None,
        }
    }
}

/// Canonical campaign and infinite-mode snapshot of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerProgress {
    pub player_id: PlayerId,
    pub current_level: i32,
    pub total_score: i32,
    pub total_stars: i32,
    pub infinite_high_score: i32,
    pub infinite_high_wave: i32,
    pub levels: Vec<LevelProgress>,
    pub created_at: String, // ISO 8601 string
    pub updated_at: String, // ISO 8601 string
}

impl PlayerProgress {
    /// Number of levels completed at least once.
    pub fn completed_levels(&self) -> usize {
        self.levels.iter().filter(|level| level.completed).count()
    }

    pub fn level(&self, level_id: LevelId) -> Option<&LevelProgress> {
        self.levels.iter().find(|level| level.id == level_id)
    }

    pub fn level_mut(&mut self, level_id: LevelId) -> Option<&mut LevelProgress> {
        self.levels.iter_mut().find(|level| level.id == level_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LevelCompleteRequest {
    pub level_id: LevelId,
    pub score: i32,
    pub stars: i32,
    pub shots: i32,
}

/// Partial overwrite of a progress record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProgressUpdateRequest {
    pub current_level: Option<i32>,
    pub total_score: Option<i32>,
    pub total_stars: Option<i32>,
    pub levels: Option<Vec<LevelProgress>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_progress() -> PlayerProgress {
        let mut levels: Vec<LevelProgress> = (1..=50).map(|id| LevelProgress::new(id, id <= 3)).collect();
        levels[0].completed = true;
        levels[0].stars = 2;
        levels[0].best_score = 1200;
        levels[0].last_played = Some("2025-01-01T10:00:00+00:00".to_string());

        PlayerProgress {
            player_id: "player-1".to_string(),
            current_level: 2,
            total_score: 1200,
            total_stars: 2,
            infinite_high_score: 900,
            infinite_high_wave: 4,
            levels,
            created_at: "2025-01-01T09:00:00+00:00".to_string(),
            updated_at: "2025-01-01T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_progress_serde_round_trip() {
        let progress = sample_progress();

        let json = serde_json::to_string(&progress).unwrap();
        let restored: PlayerProgress = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, progress);
    }

    #[test]
    fn test_progress_uses_camel_case_keys() {
        let value = serde_json::to_value(sample_progress()).unwrap();

        assert_eq!(value["playerId"], "player-1");
        assert_eq!(value["infiniteHighWave"], 4);
        assert_eq!(value["levels"][0]["bestScore"], 1200);
        assert!(value["levels"][1]["lastPlayed"].is_null());
    }

    #[test]
    fn test_completed_levels_counts_only_completed() {
        let progress = sample_progress();
        assert_eq!(progress.completed_levels(), 1);
        assert!(progress.level(51).is_none());
    }

    #[test]
    fn test_update_request_missing_fields_are_none() {
        let update: ProgressUpdateRequest = serde_json::from_str(r#"{"totalScore": 10}"#).unwrap();

        assert_eq!(update.total_score, Some(10));
        assert!(update.current_level.is_none());
        assert!(update.levels.is_none());
    }
}
