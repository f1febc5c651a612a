use std::sync::Arc;

use league_core::{ScoreSummary, score_summary};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId,
    r#match::{MatchRepository, MatchStatus},
    score::ScoreRepository,
    tournament::TournamentRepository,
};

#[derive(Clone, Debug, Serialize)]
pub struct TournamentSummary {
    pub tournament_id: TournamentId,
    pub name: String,
    pub team_count: usize,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub in_progress_matches: usize,
    pub scheduled_matches: usize,
    pub scores: ScoreSummary,
}

#[async_trait::async_trait]
pub trait GetTournamentSummaryUseCase {
    async fn get_tournament_summary(
        &self,
        tournament_id: TournamentId,
    ) -> Result<TournamentSummary, GetTournamentSummaryError>;
}

#[derive(Debug, Error)]
pub enum GetTournamentSummaryError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("storage failure")]
    Repository,
}

pub struct GetTournamentSummaryUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    S: ScoreRepository,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    score_repository: Arc<S>,
}

impl<T: TournamentRepository, M: MatchRepository, S: ScoreRepository>
    GetTournamentSummaryUseCaseImpl<T, M, S>
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
> GetTournamentSummaryUseCase for GetTournamentSummaryUseCaseImpl<T, M, S>
{
    async fn get_tournament_summary(
        &self,
        tournament_id: TournamentId,
    ) -> Result<TournamentSummary, GetTournamentSummaryError> {
        let not_found_or_storage = |e: RepoRetrieveError| match e {
            RepoRetrieveError::NotFound => GetTournamentSummaryError::TournamentNotFound,
            RepoRetrieveError::StorageError(e) => {
                log::error!("Error loading tournament {}: {}", tournament_id, e);
                GetTournamentSummaryError::Repository
            }
        };
        let tournament = self
            .tournament_repository
            .get_tournament(tournament_id)
            .await
            .map_err(not_found_or_storage)?;
        let teams = self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
            .map_err(not_found_or_storage)?;

        let matches = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                GetTournamentSummaryError::Repository
            })?;
        let sheets = self
            .score_repository
            .get_score_sheets(matches.iter().map(|m| m.id).collect())
            .await
            .map_err(|e| {
                log::error!("Error loading scores of tournament {}: {}", tournament_id, e);
                GetTournamentSummaryError::Repository
            })?;

        let count = |status| matches.iter().filter(|m| m.status == status).count();
        Ok(TournamentSummary {
            tournament_id,
            name: tournament.name,
            team_count: teams.len(),
            total_matches: matches.len(),
            completed_matches: count(MatchStatus::Completed),
            in_progress_matches: count(MatchStatus::InProgress),
            scheduled_matches: count(MatchStatus::Scheduled),
            scores: score_summary(sheets.iter().flat_map(|s| s.scores.iter())),
        })
    }
}
