pub mod compute_points;
pub mod finalize;
pub mod record_score;
