use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Catalog template plus the per-player unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    pub progress: i32,
    pub target: i32,
    pub unlocked_at: Option<String>, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerAchievements {
    pub player_id: PlayerId,
    pub achievements: Vec<Achievement>,
    pub updated_at: String, // ISO 8601 string
}

impl PlayerAchievements {
    pub fn get(&self, achievement_id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == achievement_id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievements_serde_round_trip() {
        let record = PlayerAchievements {
            player_id: "player-1".to_string(),
            achievements: vec![
                Achievement {
                    id: "first-steps".to_string(),
                    name: "First Steps".to_string(),
                    description: "Complete your first level".to_string(),
                    icon: "🌟".to_string(),
                    unlocked: true,
                    progress: 1,
                    target: 1,
                    unlocked_at: Some("2025-02-03T04:05:06.789+00:00".to_string()),
                },
                Achievement {
                    id: "bubble-destroyer".to_string(),
                    name: "Bubble Destroyer".to_string(),
                    description: "Pop 1000 bubbles total".to_string(),
                    icon: "💥".to_string(),
                    unlocked: false,
                    progress: 0,
                    target: 1000,
                    unlocked_at: None,
                },
            ],
            updated_at: "2025-02-03T04:05:06.789+00:00".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"unlockedAt\""));

        let restored: PlayerAchievements = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.unlocked_count(), 1);
    }
}
