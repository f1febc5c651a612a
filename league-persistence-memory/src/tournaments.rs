use std::collections::HashMap;

use league_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, TournamentId,
    tournament::{Player, Tournament, TournamentRepository},
};
use league_core::{Team, TeamId};
use parking_lot::RwLock;

#[derive(Default)]
struct Registry {
    tournaments: HashMap<TournamentId, Tournament>,
    teams: HashMap<TournamentId, Vec<Team>>,
    players: HashMap<TeamId, Vec<Player>>,
}

/// Registration data. Written while a league is set up, read by every workflow.
pub struct TournamentRepositoryImpl {
    registry: RwLock<Registry>,
}

impl TournamentRepositoryImpl {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn add_tournament(&self, tournament: Tournament) -> Result<(), RepoCreateError> {
        let mut registry = self.registry.write();
        if registry.tournaments.contains_key(&tournament.id) {
            return Err(RepoCreateError::Conflict);
        }
        registry.teams.insert(tournament.id, Vec::new());
        registry.tournaments.insert(tournament.id, tournament);
        Ok(())
    }

    pub fn register_team(
        &self,
        tournament_id: TournamentId,
        team: Team,
    ) -> Result<(), RepoCreateError> {
        let mut registry = self.registry.write();
        let Some(teams) = registry.teams.get_mut(&tournament_id) else {
            return Err(RepoCreateError::StorageError(format!(
                "unknown tournament {}",
                tournament_id
            )));
        };
        if teams.iter().any(|t| t.id == team.id) {
            return Err(RepoCreateError::Conflict);
        }
        teams.push(team);
        Ok(())
    }

    pub fn add_player(&self, player: Player) -> Result<(), RepoCreateError> {
        let mut registry = self.registry.write();
        let players = registry.players.entry(player.team_id).or_default();
        if players.iter().any(|p| p.id == player.id) {
            return Err(RepoCreateError::Conflict);
        }
        players.push(player);
        Ok(())
    }
}

#[async_trait::async_trait]
impl TournamentRepository for TournamentRepositoryImpl {
    async fn get_tournament(&self, id: TournamentId) -> Result<Tournament, RepoRetrieveError> {
        self.registry
            .read()
            .tournaments
            .get(&id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_registered_teams(&self, id: TournamentId) -> Result<Vec<Team>, RepoRetrieveError> {
        self.registry
            .read()
            .teams
            .get(&id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_team_players(&self, team_id: TeamId) -> Result<Vec<Player>, RepoError> {
        Ok(self
            .registry
            .read()
            .players
            .get(&team_id)
            .cloned()
            .unwrap_or_default())
    }
}
