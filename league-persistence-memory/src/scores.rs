use dashmap::DashMap;
use league_app::domain::{RepoError, score::ScoreRepository};
use league_core::{MatchId, ScoreSheet};

pub struct ScoreRepositoryImpl {
    sheets: DashMap<MatchId, ScoreSheet>,
}

impl ScoreRepositoryImpl {
    pub fn new() -> Self {
        Self {
            sheets: DashMap::new(),
        }
    }
}

#[async_trait::async_trait]
impl ScoreRepository for ScoreRepositoryImpl {
    async fn get_score_sheet(&self, match_id: MatchId) -> Result<Option<ScoreSheet>, RepoError> {
        Ok(self.sheets.get(&match_id).map(|s| s.clone()))
    }

    async fn save_score_sheet(&self, sheet: ScoreSheet) -> Result<(), RepoError> {
        self.sheets.insert(sheet.match_id, sheet);
        Ok(())
    }

    async fn get_score_sheets(
        &self,
        match_ids: Vec<MatchId>,
    ) -> Result<Vec<ScoreSheet>, RepoError> {
        Ok(match_ids
            .iter()
            .filter_map(|id| self.sheets.get(id).map(|s| s.clone()))
            .collect())
    }
}
