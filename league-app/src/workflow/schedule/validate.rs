use std::sync::Arc;

use league_core::{Schedule, ScheduleSummary, TeamId, ValidationReport};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId, r#match::MatchRepository, schedule::SchedulingService,
    tournament::TournamentRepository,
};

#[derive(Clone, Debug, Serialize)]
pub struct StoredScheduleReport {
    pub report: ValidationReport,
    pub summary: ScheduleSummary,
}

#[async_trait::async_trait]
pub trait ValidateStoredScheduleUseCase {
    async fn validate_stored_schedule(
        &self,
        tournament_id: TournamentId,
    ) -> Result<StoredScheduleReport, ValidateStoredScheduleError>;
}

#[derive(Debug, Error)]
pub enum ValidateStoredScheduleError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("storage failure")]
    Repository,
}

pub struct ValidateStoredScheduleUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    S: SchedulingService,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    scheduling_service: Arc<S>,
}

impl<T: TournamentRepository, M: MatchRepository, S: SchedulingService>
    ValidateStoredScheduleUseCaseImpl<T, M, S>
{
    pub fn new(
        tournament_repository: Arc<T>,
        match_repository: Arc<M>,
        scheduling_service: Arc<S>,
    ) -> Self {
        Self {
            tournament_repository,
            match_repository,
            scheduling_service,
        }
    }
}

#[async_trait::async_trait]
impl<
    T: TournamentRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    S: SchedulingService + Send + Sync + 'static,
> ValidateStoredScheduleUseCase for ValidateStoredScheduleUseCaseImpl<T, M, S>
{
    async fn validate_stored_schedule(
        &self,
        tournament_id: TournamentId,
    ) -> Result<StoredScheduleReport, ValidateStoredScheduleError> {
        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => {
                return Err(ValidateStoredScheduleError::TournamentNotFound);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(ValidateStoredScheduleError::Repository);
            }
        };
        let matches = self
            .match_repository
            .list_matches(tournament_id)
            .await
            .map_err(|e| {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                ValidateStoredScheduleError::Repository
            })?;

        let roster: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let schedule = Schedule::from_pairings(matches.iter().map(|m| m.pairing()), &roster);
        let report = self.scheduling_service.check(&schedule, &teams);
        if !report.is_valid {
            log::debug!(
                "Stored schedule of tournament {} has {} issue(s)",
                tournament_id,
                report.issues.len()
            );
        }

        Ok(StoredScheduleReport {
            summary: schedule.summary(teams.len()),
            report,
        })
    }
}
