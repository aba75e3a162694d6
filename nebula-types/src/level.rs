use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::LevelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Legendary,
}

/// Static description of one campaign level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Level {
    pub id: LevelId,
    pub theme: String,
    pub difficulty: Difficulty,
    pub max_shots: i32,
    pub target_score: i32,
    pub description: String,
    pub elements: Vec<String>,
    pub power_ups: Vec<String>,
    pub background: String,
}
