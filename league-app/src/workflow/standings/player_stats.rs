use std::sync::Arc;

use league_core::{PlayerStatistics, player_statistics};
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId, r#match::MatchRepository, score::ScoreRepository,
    tournament::TournamentRepository,
};

#[async_trait::async_trait]
pub trait GetPlayerStatisticsUseCase {
    async fn get_player_statistics(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<PlayerStatistics>, GetPlayerStatisticsError>;
}

#[derive(Debug, Error)]
pub enum GetPlayerStatisticsError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("storage failure")]
    Repository,
}

pub struct GetPlayerStatisticsUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    S: ScoreRepository,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    score_repository: Arc<S>,
}

impl<T: TournamentRepository, M: MatchRepository, S: ScoreRepository>
    GetPlayerStatisticsUseCaseImpl<T, M, S>
{
    pub fn new(
        tournament_repository: Arc<T>,
        match_repository: Arc<M>,
        score_repository: Arc<S>,
    ) -> Self {
        Self {
            tournament_repository,
            match_repository,
            score_repository,
        }
    }
}

#[async_trait::async_trait]
impl<
    T: TournamentRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    S: ScoreRepository + Send + Sync + 'static,
> GetPlayerStatisticsUseCase for GetPlayerStatisticsUseCaseImpl<T, M, S>
{
    async fn get_player_statistics(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<PlayerStatistics>, GetPlayerStatisticsError> {
        match self.tournament_repository.get_tournament(tournament_id).await {
            Ok(_) => {}
            Err(RepoRetrieveError::NotFound) => {
                return Err(GetPlayerStatisticsError::TournamentNotFound);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading tournament {}: {}", tournament_id, e);
                return Err(GetPlayerStatisticsError::Repository);
            }
        }

        let matches = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                GetPlayerStatisticsError::Repository
            })?;
        let sheets = self
            .score_repository
            .get_score_sheets(matches.iter().map(|m| m.id).collect())
            .await
            .map_err(|e| {
                log::error!("Error loading scores of tournament {}: {}", tournament_id, e);
                GetPlayerStatisticsError::Repository
            })?;

        Ok(player_statistics(sheets.iter().flat_map(|s| s.scores.iter())))
    }
}
