pub mod achievement_repository;
pub mod progress_repository;
pub mod score_repository;

pub use achievement_repository::AchievementRepository;
pub use progress_repository::ProgressRepository;
pub use score_repository::ScoreRepository;
