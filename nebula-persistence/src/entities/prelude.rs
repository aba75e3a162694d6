pub use super::infinite_scores::Entity as InfiniteScores;
pub use super::player_achievements::Entity as PlayerAchievements;
pub use super::player_progress::Entity as PlayerProgress;
