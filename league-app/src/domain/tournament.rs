use chrono::NaiveDate;
use league_core::{PlayerId, Team, TeamId};
use serde::{Deserialize, Serialize};

use crate::domain::{RepoError, RepoRetrieveError, TournamentId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
}

/// Read side of league registration. Tournaments, teams and players are managed
/// elsewhere; the engine only looks them up.
#[async_trait::async_trait]
pub trait TournamentRepository {
    async fn get_tournament(&self, id: TournamentId) -> Result<Tournament, RepoRetrieveError>;
    async fn get_registered_teams(&self, id: TournamentId) -> Result<Vec<Team>, RepoRetrieveError>;
    async fn get_team_players(&self, team_id: TeamId) -> Result<Vec<Player>, RepoError>;
}
