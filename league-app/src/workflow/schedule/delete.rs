use std::sync::Arc;

use thiserror::Error;

use crate::domain::{TournamentId, r#match::MatchRepository, score::ScoreRepository};

#[async_trait::async_trait]
pub trait DeleteScheduleUseCase {
    /// Returns the number of matches removed.
    async fn delete_schedule(&self, tournament_id: TournamentId)
    -> Result<usize, DeleteScheduleError>;
}

#[derive(Debug, Error)]
pub enum DeleteScheduleError {
    #[error("scores have already been recorded for this schedule")]
    ScoresRecorded,
    #[error("storage failure")]
    Repository,
}

pub struct DeleteScheduleUseCaseImpl<M: MatchRepository, S: ScoreRepository> {
    match_repository: Arc<M>,
    score_repository: Arc<S>,
}

impl<M: MatchRepository, S: ScoreRepository> DeleteScheduleUseCaseImpl<M, S> {
    pub fn new(match_repository: Arc<M>, score_repository: Arc<S>) -> Self {
        Self {
            match_repository,
            score_repository,
        }
    }
}

#[async_trait::async_trait]
impl<M: MatchRepository + Send + Sync + 'static, S: ScoreRepository + Send + Sync + 'static>
    DeleteScheduleUseCase for DeleteScheduleUseCaseImpl<M, S>
{
    async fn delete_schedule(
        &self,
        tournament_id: TournamentId,
    ) -> Result<usize, DeleteScheduleError> {
        let matches = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                DeleteScheduleError::Repository
            })?;

        let sheets = self
            .score_repository
            .get_score_sheets(matches.iter().map(|m| m.id).collect())
            .await
            .map_err(|e| {
                log::error!("Error loading scores of tournament {}: {}", tournament_id, e);
                DeleteScheduleError::Repository
            })?;
        if sheets.iter().any(|sheet| !sheet.scores.is_empty()) {
            return Err(DeleteScheduleError::ScoresRecorded);
        }

        let removed = self
            .match_repository
            .delete_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error deleting matches of tournament {}: {}", tournament_id, e);
                DeleteScheduleError::Repository
            })?;
        log::info!("Deleted {} matches of tournament {}", removed, tournament_id);
        Ok(removed)
    }
}
