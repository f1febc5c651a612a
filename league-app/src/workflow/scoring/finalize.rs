use std::sync::Arc;

use league_core::{MatchId, MatchOutcome};
use thiserror::Error;

use crate::{
    domain::{
        RepoRetrieveError, RepoUpdateError, TournamentId,
        r#match::{MatchRepository, MatchStatus},
        score::ScoreRepository,
        scoring::ScoringService,
    },
    ports::match_lock::MatchLockPort,
    workflow::standings::apply::ApplyMatchToStandingsWorkflow,
};

#[async_trait::async_trait]
pub trait FinalizeMatchUseCase {
    /// Completes the match and folds its outcome into the standings. Finalizing
    /// a completed match returns its stored outcome, and only adds it to the
    /// standings if an earlier attempt stopped before doing so.
    async fn finalize_match(&self, match_id: MatchId) -> Result<MatchOutcome, FinalizeMatchError>;
}

#[derive(Debug, Error)]
pub enum FinalizeMatchError {
    #[error("match not found")]
    MatchNotFound,
    #[error("both teams need at least one recorded score")]
    ScoresIncomplete,
    #[error("storage failure")]
    Repository,
}

pub struct FinalizeMatchUseCaseImpl<
    M: MatchRepository,
    S: ScoreRepository,
    SC: ScoringService,
    L: MatchLockPort,
    A: ApplyMatchToStandingsWorkflow,
> {
    match_repository: Arc<M>,
    score_repository: Arc<S>,
    scoring_service: Arc<SC>,
    match_lock: Arc<L>,
    apply_standings_workflow: Arc<A>,
}

impl<
    M: MatchRepository,
    S: ScoreRepository,
    SC: ScoringService,
    L: MatchLockPort,
    A: ApplyMatchToStandingsWorkflow,
> FinalizeMatchUseCaseImpl<M, S, SC, L, A>
{
    pub fn new(
        match_repository: Arc<M>,
        score_repository: Arc<S>,
        scoring_service: Arc<SC>,
        match_lock: Arc<L>,
        apply_standings_workflow: Arc<A>,
    ) -> Self {
        Self {
            match_repository,
            score_repository,
            scoring_service,
            match_lock,
            apply_standings_workflow,
        }
    }

    async fn apply_to_standings(
        &self,
        tournament_id: TournamentId,
        outcome: &MatchOutcome,
    ) -> Result<(), FinalizeMatchError> {
        self.apply_standings_workflow
            .apply_match(tournament_id, outcome)
            .await
            .map(|_| ())
            .map_err(|e| {
                log::error!(
                    "Match {} completed but standings were not updated: {}",
                    outcome.match_id,
                    e
                );
                FinalizeMatchError::Repository
            })
    }
}

#[async_trait::async_trait]
impl<
    M: MatchRepository + Send + Sync + 'static,
    S: ScoreRepository + Send + Sync + 'static,
    SC: ScoringService + Send + Sync + 'static,
    L: MatchLockPort + Send + Sync + 'static,
    A: ApplyMatchToStandingsWorkflow + Send + Sync + 'static,
> FinalizeMatchUseCase for FinalizeMatchUseCaseImpl<M, S, SC, L, A>
{
    async fn finalize_match(&self, match_id: MatchId) -> Result<MatchOutcome, FinalizeMatchError> {
        let _guard = self.match_lock.lock_match(match_id).await;

        let scheduled = match self.match_repository.get_match(match_id).await {
            Ok(scheduled) => scheduled,
            Err(RepoRetrieveError::NotFound) => return Err(FinalizeMatchError::MatchNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading match {}: {}", match_id, e);
                return Err(FinalizeMatchError::Repository);
            }
        };
        if scheduled.is_completed()
            && let Some(outcome) = scheduled.outcome
        {
            log::debug!("Match {} is already finalized", match_id);
            self.apply_to_standings(scheduled.tournament_id, &outcome).await?;
            return Ok(outcome);
        }

        let mut sheet = match self.score_repository.get_score_sheet(match_id).await {
            Ok(Some(sheet)) => sheet,
            Ok(None) => return Err(FinalizeMatchError::ScoresIncomplete),
            Err(e) => {
                log::error!("Error loading scores of match {}: {}", match_id, e);
                return Err(FinalizeMatchError::Repository);
            }
        };
        let outcome = self
            .scoring_service
            .outcome(&sheet)
            .map_err(|_| FinalizeMatchError::ScoresIncomplete)?;

        sheet.finalized = true;
        if let Err(e) = self.score_repository.save_score_sheet(sheet).await {
            log::error!("Error saving scores of match {}: {}", match_id, e);
            return Err(FinalizeMatchError::Repository);
        }

        // Standings skip a match they already hold, so a failure after this
        // point is finished by the next finalize.
        let stored = outcome.clone();
        match self
            .match_repository
            .update_match(match_id, move |m| {
                m.status = MatchStatus::Completed;
                m.winner = stored.winner;
                m.outcome = Some(stored);
            })
            .await
        {
            Ok(()) => {}
            Err(RepoUpdateError::NotFound) => return Err(FinalizeMatchError::MatchNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Error completing match {}: {}", match_id, e);
                return Err(FinalizeMatchError::Repository);
            }
        }

        self.apply_to_standings(scheduled.tournament_id, &outcome).await?;

        match outcome.winner {
            Some(winner) => log::info!(
                "Finalized match {}: team {} wins {} - {}",
                match_id,
                winner,
                outcome.points.home,
                outcome.points.away
            ),
            None => log::info!(
                "Finalized match {}: tie {} - {}",
                match_id,
                outcome.points.home,
                outcome.points.away
            ),
        }
        Ok(outcome)
    }
}
