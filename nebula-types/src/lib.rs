pub mod achievement;
pub mod errors;
pub mod level;
pub mod progress;
pub mod score;

// Re-export all types
pub use achievement::*;
pub use errors::*;
pub use level::*;
pub use progress::*;
pub use score::*;

/// Stable external key of a player. Clients pick it; the service never parses it.
pub type PlayerId = String;

/// Campaign level identifier, 1 through 50 for the shipped catalog.
pub type LevelId = i32;
