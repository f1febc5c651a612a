use std::sync::Arc;

use league_core::ScoringRules;

use crate::{
    domain::{
        r#match::MatchRepository,
        schedule::{SchedulingService, SchedulingServiceImpl},
        score::ScoreRepository,
        scoring::ScoringServiceImpl,
        stats::StatsRepository,
        tournament::TournamentRepository,
    },
    ports::match_lock::MatchLockPort,
    workflow::{
        schedule::{
            create::{CreateScheduleUseCase, CreateScheduleUseCaseImpl},
            delete::{DeleteScheduleUseCase, DeleteScheduleUseCaseImpl},
            preview::{PreviewScheduleUseCase, PreviewScheduleUseCaseImpl},
            session::{GetSessionMatchesUseCase, GetSessionMatchesUseCaseImpl},
            validate::{ValidateStoredScheduleUseCase, ValidateStoredScheduleUseCaseImpl},
        },
        scoring::{
            compute_points::{ComputeMatchPointsUseCase, ComputeMatchPointsUseCaseImpl},
            finalize::{FinalizeMatchUseCase, FinalizeMatchUseCaseImpl},
            record_score::{RecordScoreUseCase, RecordScoreUseCaseImpl},
        },
        standings::{
            apply::{ApplyMatchToStandingsWorkflow, ApplyMatchToStandingsWorkflowImpl},
            get::{GetStandingsUseCase, GetStandingsUseCaseImpl},
            player_stats::{GetPlayerStatisticsUseCase, GetPlayerStatisticsUseCaseImpl},
            recompute::{RecomputeStandingsUseCase, RecomputeStandingsUseCaseImpl},
            summary::{GetTournamentSummaryUseCase, GetTournamentSummaryUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub scheduling_service: Arc<dyn SchedulingService + Send + Sync + 'static>,

    pub schedule_preview_use_case: Box<dyn PreviewScheduleUseCase + Send + Sync + 'static>,
    pub schedule_create_use_case: Box<dyn CreateScheduleUseCase + Send + Sync + 'static>,
    pub schedule_validate_use_case: Box<dyn ValidateStoredScheduleUseCase + Send + Sync + 'static>,
    pub schedule_delete_use_case: Box<dyn DeleteScheduleUseCase + Send + Sync + 'static>,
    pub schedule_session_use_case: Box<dyn GetSessionMatchesUseCase + Send + Sync + 'static>,

    pub score_record_use_case: Box<dyn RecordScoreUseCase + Send + Sync + 'static>,
    pub score_compute_points_use_case: Box<dyn ComputeMatchPointsUseCase + Send + Sync + 'static>,
    pub match_finalize_use_case: Box<dyn FinalizeMatchUseCase + Send + Sync + 'static>,

    pub standings_apply_workflow: Arc<dyn ApplyMatchToStandingsWorkflow + Send + Sync + 'static>,
    pub standings_get_use_case: Box<dyn GetStandingsUseCase + Send + Sync + 'static>,
    pub standings_recompute_use_case: Box<dyn RecomputeStandingsUseCase + Send + Sync + 'static>,
    pub player_statistics_use_case: Box<dyn GetPlayerStatisticsUseCase + Send + Sync + 'static>,
    pub tournament_summary_use_case: Box<dyn GetTournamentSummaryUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    T: TournamentRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    S: ScoreRepository + Send + Sync + 'static,
    ST: StatsRepository + Send + Sync + 'static,
    L: MatchLockPort + Send + Sync + 'static,
>(
    tournament_repository: Arc<T>,
    match_repository: Arc<M>,
    score_repository: Arc<S>,
    stats_repository: Arc<ST>,
    match_lock: Arc<L>,
    scoring_rules: ScoringRules,
) -> Application {
    let scheduling_service = Arc::new(SchedulingServiceImpl::new());
    let scoring_service = Arc::new(ScoringServiceImpl::new(scoring_rules));

    let apply_standings_workflow = Arc::new(ApplyMatchToStandingsWorkflowImpl::new(
        tournament_repository.clone(),
        stats_repository.clone(),
    ));

    Application {
        scheduling_service: scheduling_service.clone(),

        schedule_preview_use_case: Box::new(PreviewScheduleUseCaseImpl::new(
            tournament_repository.clone(),
            scheduling_service.clone(),
        )),
        schedule_create_use_case: Box::new(CreateScheduleUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
            scheduling_service.clone(),
        )),
        schedule_validate_use_case: Box::new(ValidateStoredScheduleUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
            scheduling_service.clone(),
        )),
        schedule_delete_use_case: Box::new(DeleteScheduleUseCaseImpl::new(
            match_repository.clone(),
            score_repository.clone(),
        )),
        schedule_session_use_case: Box::new(GetSessionMatchesUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
        )),

        score_record_use_case: Box::new(RecordScoreUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
            score_repository.clone(),
            scoring_service.clone(),
            match_lock.clone(),
        )),
        score_compute_points_use_case: Box::new(ComputeMatchPointsUseCaseImpl::new(
            match_repository.clone(),
            score_repository.clone(),
            scoring_service.clone(),
            match_lock.clone(),
        )),
        match_finalize_use_case: Box::new(FinalizeMatchUseCaseImpl::new(
            match_repository.clone(),
            score_repository.clone(),
            scoring_service.clone(),
            match_lock.clone(),
            apply_standings_workflow.clone(),
        )),

        standings_apply_workflow: apply_standings_workflow.clone(),
        standings_get_use_case: Box::new(GetStandingsUseCaseImpl::new(
            tournament_repository.clone(),
            stats_repository.clone(),
        )),
        standings_recompute_use_case: Box::new(RecomputeStandingsUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
            stats_repository.clone(),
        )),
        player_statistics_use_case: Box::new(GetPlayerStatisticsUseCaseImpl::new(
            tournament_repository.clone(),
            match_repository.clone(),
            score_repository.clone(),
        )),
        tournament_summary_use_case: Box::new(GetTournamentSummaryUseCaseImpl::new(
            tournament_repository,
            match_repository,
            score_repository,
        )),
    }
}
