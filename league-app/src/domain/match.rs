use chrono::NaiveDate;
use league_core::{MatchId, MatchOutcome, Pairing, TeamId};
use serde::{Deserialize, Serialize};

use crate::domain::{RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TournamentId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
}

/// A scheduled pairing as stored, together with its latest computed outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub session_number: u32,
    pub match_number: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub date: Option<NaiveDate>,
    pub status: MatchStatus,
    pub winner: Option<TeamId>,
    pub outcome: Option<MatchOutcome>,
}

impl Match {
    pub fn scheduled(
        tournament_id: TournamentId,
        pairing: &Pairing,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: MatchId::new(),
            tournament_id,
            session_number: pairing.session,
            match_number: pairing.match_number,
            home: pairing.home,
            away: pairing.away,
            date,
            status: MatchStatus::Scheduled,
            winner: None,
            outcome: None,
        }
    }

    pub fn pairing(&self) -> Pairing {
        Pairing {
            session: self.session_number,
            match_number: self.match_number,
            home: self.home,
            away: self.away,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}

#[async_trait::async_trait]
pub trait MatchRepository {
    /// Stores a whole schedule at once. Fails with `Conflict` when the
    /// tournament already has matches.
    async fn create_matches(
        &self,
        tournament_id: TournamentId,
        matches: Vec<Match>,
    ) -> Result<(), RepoCreateError>;
    async fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, RepoError>;
    async fn get_match(&self, match_id: MatchId) -> Result<Match, RepoRetrieveError>;
    async fn delete_matches(&self, tournament_id: TournamentId) -> Result<usize, RepoError>;
    async fn update_match<R: Send + 'static>(
        &self,
        match_id: MatchId,
        update_fn: impl for<'a> FnOnce(&'a mut Match) -> R + Send + 'static,
    ) -> Result<R, RepoUpdateError>;
}
