pub mod lock;
pub mod matches;
pub mod scores;
pub mod stats;
pub mod tournaments;
