use std::sync::Arc;

use league_core::{TeamStatistics, rank_standings};
use thiserror::Error;

use crate::{
    domain::{
        RepoRetrieveError, TournamentId, stats::StatsRepository, tournament::TournamentRepository,
    },
    workflow::standings::complete_table,
};

#[async_trait::async_trait]
pub trait GetStandingsUseCase {
    async fn get_standings(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TeamStatistics>, GetStandingsError>;
}

#[derive(Debug, Error)]
pub enum GetStandingsError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("storage failure")]
    Repository,
}

pub struct GetStandingsUseCaseImpl<T: TournamentRepository, ST: StatsRepository> {
    tournament_repository: Arc<T>,
    stats_repository: Arc<ST>,
}

impl<T: TournamentRepository, ST: StatsRepository> GetStandingsUseCaseImpl<T, ST> {
    pub fn new(tournament_repository: Arc<T>, stats_repository: Arc<ST>) -> Self {
        Self {
            tournament_repository,
            stats_repository,
        }
    }
}

#[async_trait::async_trait]
impl<T: TournamentRepository + Send + Sync + 'static, ST: StatsRepository + Send + Sync + 'static>
    GetStandingsUseCase for GetStandingsUseCaseImpl<T, ST>
{
    async fn get_standings(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TeamStatistics>, GetStandingsError> {
        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => return Err(GetStandingsError::TournamentNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(GetStandingsError::Repository);
            }
        };
        let stored = self
            .stats_repository
            .list_team_stats(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error loading standings of tournament {}: {}", tournament_id, e);
                GetStandingsError::Repository
            })?;

        let mut standings = complete_table(&teams, stored);
        rank_standings(&mut standings);
        Ok(standings)
    }
}
