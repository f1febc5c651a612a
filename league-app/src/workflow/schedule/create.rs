use std::sync::Arc;

use chrono::NaiveDate;
use league_core::{ScheduleError, ScheduleIssue, TeamId, ValidationReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    RepoCreateError, RepoRetrieveError, TournamentId,
    r#match::{Match, MatchRepository},
    schedule::SchedulingService,
    tournament::TournamentRepository,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// Falls back to the tournament's own start date.
    pub start_date: Option<NaiveDate>,
    pub days_between_sessions: u32,
    pub override_order: Option<Vec<TeamId>>,
    pub force_create: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreatedSchedule {
    pub matches_created: usize,
    pub sessions: usize,
    pub issues: Vec<ScheduleIssue>,
    pub forced: bool,
    pub matches: Vec<Match>,
}

#[async_trait::async_trait]
pub trait CreateScheduleUseCase {
    async fn create_schedule(
        &self,
        tournament_id: TournamentId,
        request: CreateScheduleRequest,
    ) -> Result<CreatedSchedule, CreateScheduleError>;
}

#[derive(Debug, Error)]
pub enum CreateScheduleError {
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("tournament already has scheduled matches")]
    AlreadyScheduled,
    #[error("schedule has {} issue(s)", .0.issues.len())]
    ScheduleConflict(ValidationReport),
    #[error("storage failure")]
    Repository,
}

pub struct CreateScheduleUseCaseImpl<
    T: TournamentRepository,
    M: MatchRepository,
    S: SchedulingService,
> {
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    scheduling_service: Arc<S>,
}

impl<T: TournamentRepository, M: MatchRepository, S: SchedulingService>
    CreateScheduleUseCaseImpl<T, M, S>
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
> CreateScheduleUseCase for CreateScheduleUseCaseImpl<T, M, S>
{
    async fn create_schedule(
        &self,
        tournament_id: TournamentId,
        request: CreateScheduleRequest,
    ) -> Result<CreatedSchedule, CreateScheduleError> {
        let tournament = match self.tournament_repository.get_tournament(tournament_id).await {
            Ok(tournament) => tournament,
            Err(RepoRetrieveError::NotFound) => return Err(CreateScheduleError::TournamentNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading tournament {}: {}", tournament_id, e);
                return Err(CreateScheduleError::Repository);
            }
        };

        match self.match_repository.list_matches(tournament_id).await {
            Ok(existing) if !existing.is_empty() => {
                return Err(CreateScheduleError::AlreadyScheduled);
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Error listing matches of tournament {}: {}", tournament_id, e);
                return Err(CreateScheduleError::Repository);
            }
        }

        let teams = match self
            .tournament_repository
            .get_registered_teams(tournament_id)
            .await
        {
            Ok(teams) => teams,
            Err(RepoRetrieveError::NotFound) => return Err(CreateScheduleError::TournamentNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error loading teams of tournament {}: {}", tournament_id, e);
                return Err(CreateScheduleError::Repository);
            }
        };

        let schedule = self
            .scheduling_service
            .plan(teams.clone(), request.override_order.as_deref())
            .map_err(|ScheduleError::InvalidInput(msg)| CreateScheduleError::InvalidInput(msg))?;

        let report = self.scheduling_service.check(&schedule, &teams);
        if !report.is_valid {
            if !request.force_create {
                return Err(CreateScheduleError::ScheduleConflict(report));
            }
            log::warn!(
                "Force-creating schedule for tournament {} despite {} issue(s)",
                tournament_id,
                report.issues.len()
            );
        }

        let start_date = request.start_date.or(tournament.start_date);
        let matches: Vec<Match> = schedule
            .pairings()
            .map(|pairing| {
                let date = self.scheduling_service.session_date(
                    start_date,
                    pairing.session,
                    request.days_between_sessions,
                );
                Match::scheduled(tournament_id, pairing, date)
            })
            .collect();

        match self
            .match_repository
            .create_matches(tournament_id, matches.clone())
            .await
        {
            Ok(()) => {}
            Err(RepoCreateError::Conflict) => return Err(CreateScheduleError::AlreadyScheduled),
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Error storing schedule of tournament {}: {}", tournament_id, e);
                return Err(CreateScheduleError::Repository);
            }
        }

        log::info!(
            "Created schedule for tournament {}: {} matches over {} sessions",
            tournament_id,
            matches.len(),
            schedule.sessions.len()
        );

        Ok(CreatedSchedule {
            matches_created: matches.len(),
            sessions: schedule.sessions.len(),
            forced: !report.is_valid,
            issues: report.issues,
            matches,
        })
    }
}
