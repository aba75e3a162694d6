use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::PlayerId;

/// One finished infinite-mode run. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InfiniteScore {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub score: i32,
    pub wave: i32,
    pub timestamp: String, // ISO 8601 string
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InfiniteScoreRequest {
    pub score: i32,
    pub wave: i32,
}
