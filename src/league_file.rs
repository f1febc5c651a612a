use std::collections::HashMap;

use chrono::NaiveDate;
use league_app::domain::{
    RepoCreateError, TournamentId,
    tournament::{Player, Tournament},
};
use league_core::{PlayerId, Team, TeamId};
use league_persistence_memory::tournaments::TournamentRepositoryImpl;
use serde::Deserialize;
use thiserror::Error;

/// A league as written by hand: teams and players by name, and optionally the
/// scores bowled so far, addressed by session and match number.
#[derive(Debug, Deserialize)]
pub struct LeagueFile {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub days_between_sessions: Option<u32>,
    /// Team names in seating order.
    pub override_order: Option<Vec<String>>,
    #[serde(default)]
    pub force_create: bool,
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub seed: Option<u32>,
    #[serde(default)]
    pub players: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultEntry {
    pub session: u32,
    #[serde(rename = "match")]
    pub match_number: u32,
    pub scores: Vec<ScoreEntry>,
    #[serde(default = "finalize_by_default")]
    pub finalize: bool,
}

fn finalize_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ScoreEntry {
    pub team: String,
    pub player: String,
    pub games: [u32; 3],
    pub handicap: Option<u32>,
}

#[derive(Debug, Error)]
pub enum LeagueFileError {
    #[error("could not read league file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse league file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("team {0:?} is listed more than once")]
    DuplicateTeam(String),
    #[error("player {player:?} is listed more than once for team {team:?}")]
    DuplicatePlayer { team: String, player: String },
    #[error("unknown team {0:?}")]
    UnknownTeam(String),
    #[error("unknown player {player:?} on team {team:?}")]
    UnknownPlayer { team: String, player: String },
    #[error("could not register league: {0}")]
    Registration(RepoCreateError),
}

/// Ids handed out while registering a league file, for mapping names both ways.
pub struct SeededLeague {
    pub tournament_id: TournamentId,
    team_ids: HashMap<String, TeamId>,
    player_ids: HashMap<(TeamId, String), PlayerId>,
    team_names: HashMap<TeamId, String>,
    player_names: HashMap<PlayerId, String>,
}

impl SeededLeague {
    pub fn team_id(&self, name: &str) -> Result<TeamId, LeagueFileError> {
        self.team_ids
            .get(name)
            .copied()
            .ok_or_else(|| LeagueFileError::UnknownTeam(name.to_string()))
    }

    pub fn player_id(&self, team: &str, player: &str) -> Result<PlayerId, LeagueFileError> {
        let team_id = self.team_id(team)?;
        self.player_ids
            .get(&(team_id, player.to_string()))
            .copied()
            .ok_or_else(|| LeagueFileError::UnknownPlayer {
                team: team.to_string(),
                player: player.to_string(),
            })
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.team_names.get(&id).map(String::as_str)
    }

    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.player_names.get(&id).map(String::as_str)
    }
}

impl LeagueFile {
    pub fn load(path: &str) -> Result<Self, LeagueFileError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn override_ids(
        &self,
        league: &SeededLeague,
    ) -> Result<Option<Vec<TeamId>>, LeagueFileError> {
        self.override_order
            .as_ref()
            .map(|names| names.iter().map(|name| league.team_id(name)).collect())
            .transpose()
    }

    /// Registers the tournament, its teams and their players.
    pub fn seed(
        &self,
        tournaments: &TournamentRepositoryImpl,
    ) -> Result<SeededLeague, LeagueFileError> {
        let tournament_id = TournamentId::new();
        tournaments
            .add_tournament(Tournament {
                id: tournament_id,
                name: self.name.clone(),
                start_date: self.start_date,
            })
            .map_err(LeagueFileError::Registration)?;

        let mut league = SeededLeague {
            tournament_id,
            team_ids: HashMap::new(),
            player_ids: HashMap::new(),
            team_names: HashMap::new(),
            player_names: HashMap::new(),
        };

        for entry in &self.teams {
            if league.team_ids.contains_key(&entry.name) {
                return Err(LeagueFileError::DuplicateTeam(entry.name.clone()));
            }
            let team = Team::new(TeamId::new(), entry.name.clone(), entry.seed);
            tournaments
                .register_team(tournament_id, team.clone())
                .map_err(LeagueFileError::Registration)?;
            league.team_ids.insert(entry.name.clone(), team.id);
            league.team_names.insert(team.id, entry.name.clone());

            for name in &entry.players {
                let key = (team.id, name.clone());
                if league.player_ids.contains_key(&key) {
                    return Err(LeagueFileError::DuplicatePlayer {
                        team: entry.name.clone(),
                        player: name.clone(),
                    });
                }
                let player = Player {
                    id: PlayerId::new(),
                    team_id: team.id,
                    name: name.clone(),
                };
                tournaments
                    .add_player(player.clone())
                    .map_err(LeagueFileError::Registration)?;
                league.player_ids.insert(key, player.id);
                league.player_names.insert(player.id, player.name);
            }
        }

        log::info!(
            "Registered league {:?} with {} teams",
            self.name,
            self.teams.len()
        );
        Ok(league)
    }
}
