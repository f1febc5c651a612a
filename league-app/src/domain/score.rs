use league_core::{MatchId, ScoreSheet};

use crate::domain::RepoError;

#[async_trait::async_trait]
pub trait ScoreRepository {
    async fn get_score_sheet(&self, match_id: MatchId) -> Result<Option<ScoreSheet>, RepoError>;
    /// Replaces the stored sheet of the match.
    async fn save_score_sheet(&self, sheet: ScoreSheet) -> Result<(), RepoError>;
    async fn get_score_sheets(&self, match_ids: Vec<MatchId>) -> Result<Vec<ScoreSheet>, RepoError>;
}
