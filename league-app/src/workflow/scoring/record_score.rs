use std::sync::Arc;

use league_core::{
    MatchId, MatchState, PlayerGameScore, PlayerId, ScoreError, ScoreSheet, TeamId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::{
    domain::{
        RepoRetrieveError, RepoUpdateError,
        r#match::{MatchRepository, MatchStatus},
        score::ScoreRepository,
        scoring::ScoringService,
        tournament::TournamentRepository,
    },
    ports::match_lock::MatchLockPort,
};

/// A player's series as submitted by a caller, before it becomes a score.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    #[validate(range(min = 0, max = 300))]
    pub game1: u32,
    #[validate(range(min = 0, max = 300))]
    pub game2: u32,
    #[validate(range(min = 0, max = 300))]
    pub game3: u32,
    #[validate(range(max = 900))]
    pub handicap: Option<u32>,
}

#[async_trait::async_trait]
pub trait RecordScoreUseCase {
    async fn record_score(
        &self,
        submission: ScoreSubmission,
    ) -> Result<PlayerGameScore, RecordScoreError>;
}

#[derive(Debug, Error)]
pub enum RecordScoreError {
    #[error("match not found")]
    MatchNotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("player {player} already has a score for match {match_id}")]
    DuplicateScore { match_id: MatchId, player: PlayerId },
    #[error("player {player} of team {team} is not rostered for this match")]
    NotRostered { player: PlayerId, team: TeamId },
    #[error("match is already finalized")]
    MatchAlreadyFinalized,
    #[error("storage failure")]
    Repository,
}

impl From<ScoreError> for RecordScoreError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::DuplicateScore { match_id, player } => {
                RecordScoreError::DuplicateScore { match_id, player }
            }
            ScoreError::NotRostered { player, team } => {
                RecordScoreError::NotRostered { player, team }
            }
            ScoreError::Validation(msg) => RecordScoreError::Validation(msg),
            other @ ScoreError::ScoresIncomplete => RecordScoreError::Validation(other.to_string()),
        }
    }
}

pub struct RecordScoreUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    S: ScoreRepository,
    SC: ScoringService,
    L: MatchLockPort,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    score_repository: Arc<S>,
    scoring_service: Arc<SC>,
    match_lock: Arc<L>,
}

impl<
    T: TournamentRepository,
    M: MatchRepository,
    S: ScoreRepository,
    SC: ScoringService,
    L: MatchLockPort,
> RecordScoreUseCaseImpl<T, M, S, SC, L>
{
    pub fn new(
        tournament_repository: Arc<T>,
        match_repository: Arc<M>,
        score_repository: Arc<S>,
        scoring_service: Arc<SC>,
        match_lock: Arc<L>,
    ) -> Self {
        Self {
            tournament_repository,
            match_repository,
            score_repository,
            scoring_service,
            match_lock,
        }
    }
}

#[async_trait::async_trait]
impl<
    T: TournamentRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    S: ScoreRepository + Send + Sync + 'static,
    SC: ScoringService + Send + Sync + 'static,
    L: MatchLockPort + Send + Sync + 'static,
> RecordScoreUseCase for RecordScoreUseCaseImpl<T, M, S, SC, L>
{
    async fn record_score(
        &self,
        submission: ScoreSubmission,
    ) -> Result<PlayerGameScore, RecordScoreError> {
        let match_id = submission.match_id;
        let _guard = self.match_lock.lock_match(match_id).await;

        let scheduled = match self.match_repository.get_match(match_id).await {
            Ok(scheduled) => scheduled,
            Err(RepoRetrieveError::NotFound) => return Err(RecordScoreError::MatchNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading match {}: {}", match_id, e);
                return Err(RecordScoreError::Repository);
            }
        };
        if scheduled.is_completed() {
            return Err(RecordScoreError::MatchAlreadyFinalized);
        }

        submission
            .validate()
            .map_err(|e| RecordScoreError::Validation(e.to_string()))?;
        let score = PlayerGameScore::new(
            match_id,
            submission.player_id,
            submission.team_id,
            [submission.game1, submission.game2, submission.game3],
            submission.handicap,
        )?;

        let home_players = self
            .tournament_repository
            .get_team_players(scheduled.home)
            .await;
        let away_players = self
            .tournament_repository
            .get_team_players(scheduled.away)
            .await;
        let (home_players, away_players) = match (home_players, away_players) {
            (Ok(home), Ok(away)) => (home, away),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("Error loading roster of match {}: {}", match_id, e);
                return Err(RecordScoreError::Repository);
            }
        };
        let roster = self
            .scoring_service
            .roster(&scheduled, &home_players, &away_players);

        let mut sheet = match self.score_repository.get_score_sheet(match_id).await {
            Ok(Some(sheet)) => sheet,
            Ok(None) => ScoreSheet::new(match_id, scheduled.home, scheduled.away),
            Err(e) => {
                log::error!("Error loading scores of match {}: {}", match_id, e);
                return Err(RecordScoreError::Repository);
            }
        };
        if sheet.finalized {
            return Err(RecordScoreError::MatchAlreadyFinalized);
        }

        sheet.record(score.clone(), &roster)?;

        // Points follow the latest scores until the match is finalized.
        let outcome = match sheet.state() {
            MatchState::BothTeamsScored => self.scoring_service.outcome(&sheet).ok(),
            _ => None,
        };

        if let Err(e) = self.score_repository.save_score_sheet(sheet).await {
            log::error!("Error saving scores of match {}: {}", match_id, e);
            return Err(RecordScoreError::Repository);
        }

        let update = self
            .match_repository
            .update_match(match_id, move |m| {
                if m.status == MatchStatus::Scheduled {
                    m.status = MatchStatus::InProgress;
                }
                if outcome.is_some() {
                    m.outcome = outcome;
                }
            })
            .await;
        match update {
            Ok(()) => {}
            Err(RepoUpdateError::NotFound) => return Err(RecordScoreError::MatchNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Error updating match {}: {}", match_id, e);
                return Err(RecordScoreError::Repository);
            }
        }

        log::debug!(
            "Recorded series {} (+{}) for player {} in match {}",
            score.series_total(),
            score.handicap,
            score.player_id,
            match_id
        );
        Ok(score)
    }
}
