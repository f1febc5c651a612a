use std::sync::Arc;

use league_core::{Schedule, TeamId};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId,
    r#match::{Match, MatchRepository},
    tournament::TournamentRepository,
};

#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub session_number: u32,
    pub matches: Vec<Match>,
    pub bye: Option<TeamId>,
}

#[async_trait::async_trait]
pub trait GetSessionMatchesUseCase {
    async fn get_session_matches(
        &self,
        tournament_id: TournamentId,
        session_number: u32,
    ) -> Result<SessionView, GetSessionMatchesError>;
}

#[derive(Debug, Error)]
pub enum GetSessionMatchesError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("session {0} is not scheduled")]
    SessionNotFound(u32),
    #[error("storage failure")]
    Repository,
}

pub struct GetSessionMatchesUseCaseImpl<T: TournamentRepository, M: MatchRepository> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
}

impl<T: TournamentRepository, M: MatchRepository> GetSessionMatchesUseCaseImpl<T, M> {
    pub fn new(tournament_repository: Arc<T>, match_repository: Arc<M>) -> Self {
        Self {
            tournament_repository,
            match_repository,
        }
    }
}

#[async_trait::async_trait]
impl<T: TournamentRepository + Send + Sync + 'static, M: MatchRepository + Send + Sync + 'static>
    GetSessionMatchesUseCase for GetSessionMatchesUseCaseImpl<T, M>
{
    async fn get_session_matches(
        &self,
        tournament_id: TournamentId,
        session_number: u32,
    ) -> Result<SessionView, GetSessionMatchesError> {
        let roster: Vec<TeamId> = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams.iter().map(|t| t.id).collect(),
            Err(RepoRetrieveError::NotFound) => {
                return Err(GetSessionMatchesError::TournamentNotFound);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(GetSessionMatchesError::Repository);
            }
        };

        let mut matches: Vec<Match> = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                GetSessionMatchesError::Repository
            })?
            .into_iter()
            .filter(|m| m.session_number == session_number)
            .collect();
        if matches.is_empty() {
            return Err(GetSessionMatchesError::SessionNotFound(session_number));
        }
        matches.sort_by_key(|m| m.match_number);

        let bye = Schedule::from_pairings(matches.iter().map(|m| m.pairing()), &roster)
            .session(session_number)
            .and_then(|s| s.bye);

        Ok(SessionView {
            session_number,
            matches,
            bye,
        })
    }
}
