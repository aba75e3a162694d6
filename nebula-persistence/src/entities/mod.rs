pub mod prelude;

pub mod infinite_scores;
pub mod player_achievements;
pub mod player_progress;
