use std::sync::Arc;

use league_core::{MatchId, MatchOutcome};
use thiserror::Error;

use crate::{
    domain::{
        RepoRetrieveError, RepoUpdateError, r#match::MatchRepository, score::ScoreRepository,
        scoring::ScoringService,
    },
    ports::match_lock::MatchLockPort,
};

#[async_trait::async_trait]
pub trait ComputeMatchPointsUseCase {
    /// Computes points and winner from the current scores and stores them over
    /// any earlier result of the match.
    async fn compute_match_points(
        &self,
        match_id: MatchId,
    ) -> Result<MatchOutcome, ComputeMatchPointsError>;
}

#[derive(Debug, Error)]
pub enum ComputeMatchPointsError {
    #[error("match not found")]
    MatchNotFound,
    #[error("both teams need at least one recorded score")]
    ScoresIncomplete,
    #[error("storage failure")]
    Repository,
}

pub struct ComputeMatchPointsUseCaseImpl<
    M: MatchRepository,
    S: ScoreRepository,
    SC: ScoringService,
    L: MatchLockPort,
> {
    match_repository: Arc<M>,
    score_repository: Arc<S>,
    scoring_service: Arc<SC>,
    match_lock: Arc<L>,
}

impl<M: MatchRepository, S: ScoreRepository, SC: ScoringService, L: MatchLockPort>
    ComputeMatchPointsUseCaseImpl<M, S, SC, L>
{
    pub fn new(
        match_repository: Arc<M>,
        score_repository: Arc<S>,
        scoring_service: Arc<SC>,
        match_lock: Arc<L>,
    ) -> Self {
        Self {
            match_repository,
            score_repository,
            scoring_service,
            match_lock,
        }
    }
}

#[async_trait::async_trait]
impl<
    M: MatchRepository + Send + Sync + 'static,
    S: ScoreRepository + Send + Sync + 'static,
    SC: ScoringService + Send + Sync + 'static,
    L: MatchLockPort + Send + Sync + 'static,
> ComputeMatchPointsUseCase for ComputeMatchPointsUseCaseImpl<M, S, SC, L>
{
    async fn compute_match_points(
        &self,
        match_id: MatchId,
    ) -> Result<MatchOutcome, ComputeMatchPointsError> {
        let _guard = self.match_lock.lock_match(match_id).await;

        let scheduled = match self.match_repository.get_match(match_id).await {
            Ok(scheduled) => scheduled,
            Err(RepoRetrieveError::NotFound) => return Err(ComputeMatchPointsError::MatchNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading match {}: {}", match_id, e);
                return Err(ComputeMatchPointsError::Repository);
            }
        };
        if scheduled.is_completed()
            && let Some(outcome) = scheduled.outcome
        {
            return Ok(outcome);
        }

        let sheet = match self.score_repository.get_score_sheet(match_id).await {
            Ok(Some(sheet)) => sheet,
            Ok(None) => return Err(ComputeMatchPointsError::ScoresIncomplete),
            Err(e) => {
                log::error!("Error loading scores of match {}: {}", match_id, e);
                return Err(ComputeMatchPointsError::Repository);
            }
        };
        let outcome = self
            .scoring_service
            .outcome(&sheet)
            .map_err(|_| ComputeMatchPointsError::ScoresIncomplete)?;

        let stored = outcome.clone();
        match self
            .match_repository
            .update_match(match_id, move |m| m.outcome = Some(stored))
            .await
        {
            Ok(()) => {}
            Err(RepoUpdateError::NotFound) => return Err(ComputeMatchPointsError::MatchNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Error storing points of match {}: {}", match_id, e);
                return Err(ComputeMatchPointsError::Repository);
            }
        }

        log::debug!(
            "Match {} points: {} - {}",
            match_id,
            outcome.points.home,
            outcome.points.away
        );
        Ok(outcome)
    }
}
