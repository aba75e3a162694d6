pub mod achievements;
pub mod errors;
pub mod events;
pub mod levels;
pub mod progress;
pub mod store;

// Re-export main components
pub use achievements::*;
pub use errors::*;
pub use events::*;
pub use levels::*;
pub use progress::*;
pub use store::*;

/// Current UTC time as an RFC 3339 string, the format every record timestamp uses.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
