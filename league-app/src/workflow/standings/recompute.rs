use std::sync::Arc;

use league_core::{MatchOutcome, TeamId, TeamStatistics, standings_drift};
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{
        RepoRetrieveError, TournamentId, r#match::MatchRepository, stats::StatsRepository,
        tournament::TournamentRepository,
    },
    workflow::standings::complete_table,
};

#[derive(Clone, Debug, Serialize)]
pub struct RecomputedStandings {
    pub standings: Vec<TeamStatistics>,
    /// Teams whose stored statistics disagreed with the match history.
    pub drifted_teams: Vec<TeamId>,
}

#[async_trait::async_trait]
pub trait RecomputeStandingsUseCase {
    async fn recompute_standings(
        &self,
        tournament_id: TournamentId,
    ) -> Result<RecomputedStandings, RecomputeStandingsError>;
}

#[derive(Debug, Error)]
pub enum RecomputeStandingsError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("storage failure")]
    Repository,
}

pub struct RecomputeStandingsUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    ST: StatsRepository,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    stats_repository: Arc<ST>,
}

impl<T: TournamentRepository, M: MatchRepository, ST: StatsRepository>
    RecomputeStandingsUseCaseImpl<T, M, ST>
{
    pub fn new(
        tournament_repository: Arc<T>,
        match_repository: Arc<M>,
        stats_repository: Arc<ST>,
    ) -> Self {
        Self {
            tournament_repository,
            match_repository,
            stats_repository,
        }
    }
}

#[async_trait::async_trait]
impl<
    T: TournamentRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    ST: StatsRepository + Send + Sync + 'static,
> RecomputeStandingsUseCase for RecomputeStandingsUseCaseImpl<T, M, ST>
{
    async fn recompute_standings(
        &self,
        tournament_id: TournamentId,
    ) -> Result<RecomputedStandings, RecomputeStandingsError> {
        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => {
                return Err(RecomputeStandingsError::TournamentNotFound);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(RecomputeStandingsError::Repository);
            }
        };

        let history: Vec<MatchOutcome> = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                RecomputeStandingsError::Repository
            })?
            .into_iter()
            .filter(|m| m.is_completed())
            .filter_map(|m| m.outcome)
            .collect();

        let rebuild_teams = teams.clone();
        let (previous, recomputed, folded) = self
            .stats_repository
            .update_standings(tournament_id, move |table| {
                let previous = table.rebuild(&rebuild_teams, &history);
                (previous, table.standings.clone(), table.applied.len())
            })
            .await
            .map_err(|e| {
                log::error!("Error storing standings of tournament {}: {}", tournament_id, e);
                RecomputeStandingsError::Repository
            })?;

        let previous = complete_table(&teams, previous);
        let drifted_teams = standings_drift(&recomputed, &previous);
        for team_id in &drifted_teams {
            log::warn!(
                "Stored statistics of team {} in tournament {} disagreed with match history",
                team_id,
                tournament_id
            );
        }
        log::info!(
            "Recomputed standings of tournament {} from {} matches, {} team(s) drifted",
            tournament_id,
            folded,
            drifted_teams.len()
        );

        Ok(RecomputedStandings {
            standings: recomputed,
            drifted_teams,
        })
    }
}
