use std::sync::Arc;

use league_core::{Schedule, ScheduleError, ScheduleSummary, TeamId, ValidationReport};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, TournamentId, schedule::SchedulingService,
    tournament::TournamentRepository,
};

#[derive(Clone, Debug, Serialize)]
pub struct SchedulePreview {
    pub schedule: Schedule,
    pub report: ValidationReport,
    pub summary: ScheduleSummary,
}

#[async_trait::async_trait]
pub trait PreviewScheduleUseCase {
    async fn preview_schedule(
        &self,
        tournament_id: TournamentId,
        override_order: Option<Vec<TeamId>>,
    ) -> Result<SchedulePreview, PreviewScheduleError>;
}

#[derive(Debug, Error)]
pub enum PreviewScheduleError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage failure")]
    Repository,
}

pub struct PreviewScheduleUseCaseImpl<T: TournamentRepository, S: SchedulingService> {
    tournament_repository: Arc<T>,
    scheduling_service: Arc<S>,
}

impl<T: TournamentRepository, S: SchedulingService> PreviewScheduleUseCaseImpl<T, S> {
    pub fn new(tournament_repository: Arc<T>, scheduling_service: Arc<S>) -> Self {
        Self {
            tournament_repository,
            scheduling_service,
        }
    }
}

#[async_trait::async_trait]
impl<T: TournamentRepository + Send + Sync + 'static, S: SchedulingService + Send + Sync + 'static>
    PreviewScheduleUseCase for PreviewScheduleUseCaseImpl<T, S>
{
    async fn preview_schedule(
        &self,
        tournament_id: TournamentId,
        override_order: Option<Vec<TeamId>>,
    ) -> Result<SchedulePreview, PreviewScheduleError> {
        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => {
                return Err(PreviewScheduleError::TournamentNotFound);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(PreviewScheduleError::Repository);
            }
        };

        let schedule = self
            .scheduling_service
            .plan(teams.clone(), override_order.as_deref())
            .map_err(|ScheduleError::InvalidInput(msg)| PreviewScheduleError::InvalidInput(msg))?;
        let report = self.scheduling_service.check(&schedule, &teams);
        let summary = schedule.summary(teams.len());

        Ok(SchedulePreview {
            schedule,
            report,
            summary,
        })
    }
}
