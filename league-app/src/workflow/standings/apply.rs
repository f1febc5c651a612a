use std::sync::Arc;

use league_core::{MatchOutcome, TeamId, TeamStatistics};
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId, stats::StatsRepository, tournament::TournamentRepository,
};

#[async_trait::async_trait]
pub trait ApplyMatchToStandingsWorkflow {
    /// Adds one finalized match to both teams' statistics and re-ranks the table.
    /// A match the standings already hold is not added again. Returns the
    /// current (home, away) statistics.
    async fn apply_match(
        &self,
        tournament_id: TournamentId,
        outcome: &MatchOutcome,
    ) -> Result<(TeamStatistics, TeamStatistics), ApplyMatchError>;
}

#[derive(Debug, Error)]
pub enum ApplyMatchError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("team {0} is not registered in the tournament")]
    TeamNotRegistered(TeamId),
    #[error("storage failure")]
    Repository,
}

pub struct ApplyMatchToStandingsWorkflowImpl<T: TournamentRepository, ST: StatsRepository> {
    tournament_repository: Arc<T>,
    stats_repository: Arc<ST>,
}

impl<T: TournamentRepository, ST: StatsRepository> ApplyMatchToStandingsWorkflowImpl<T, ST> {
    pub fn new(tournament_repository: Arc<T>, stats_repository: Arc<ST>) -> Self {
        Self {
            tournament_repository,
            stats_repository,
        }
    }
}

#[async_trait::async_trait]
impl<T: TournamentRepository + Send + Sync + 'static, ST: StatsRepository + Send + Sync + 'static>
    ApplyMatchToStandingsWorkflow for ApplyMatchToStandingsWorkflowImpl<T, ST>
{
    async fn apply_match(
        &self,
        tournament_id: TournamentId,
        outcome: &MatchOutcome,
    ) -> Result<(TeamStatistics, TeamStatistics), ApplyMatchError> {
        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => return Err(ApplyMatchError::TournamentNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(ApplyMatchError::Repository);
            }
        };
        let find_team = |team_id: TeamId| {
            teams
                .iter()
                .find(|t| t.id == team_id)
                .cloned()
                .ok_or(ApplyMatchError::TeamNotRegistered(team_id))
        };
        let home = find_team(outcome.home.team_id)?;
        let away = find_team(outcome.away.team_id)?;
        let (home_id, away_id) = (home.id, away.id);

        let folded = outcome.clone();
        let updated = self
            .stats_repository
            .update_standings(tournament_id, move |table| {
                let applied = table.apply(&home, &away, &folded);
                let pair = table.team(home_id).cloned().zip(table.team(away_id).cloned());
                pair.map(|pair| (applied, pair))
            })
            .await;
        match updated {
            Ok(Some((applied, pair))) => {
                if applied {
                    log::debug!(
                        "Applied match {} to standings of tournament {}",
                        outcome.match_id,
                        tournament_id
                    );
                } else {
                    log::debug!(
                        "Standings of tournament {} already hold match {}",
                        tournament_id,
                        outcome.match_id
                    );
                }
                Ok(pair)
            }
            Ok(None) => {
                log::error!(
                    "Statistics missing after applying match {} in tournament {}",
                    outcome.match_id,
                    tournament_id
                );
                Err(ApplyMatchError::Repository)
            }
            Err(e) => {
                log::error!("Error updating standings of tournament {}: {}", tournament_id, e);
                Err(ApplyMatchError::Repository)
            }
        }
    }
}
