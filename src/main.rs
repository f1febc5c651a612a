use std::sync::Arc;

use league_app::{
    Application, build_application,
    workflow::{
        schedule::{
            create::{CreateScheduleError, CreateScheduleRequest, CreatedSchedule},
            preview::PreviewScheduleError,
            session::GetSessionMatchesError,
        },
        scoring::{
            finalize::FinalizeMatchError,
            record_score::{RecordScoreError, ScoreSubmission},
        },
        standings::{
            get::GetStandingsError, player_stats::GetPlayerStatisticsError,
            recompute::RecomputeStandingsError, summary::GetTournamentSummaryError,
        },
    },
};
use league_core::{PlayerStatistics, TeamId, TeamStatistics};
use league_persistence_memory::{
    lock::MatchLockAdapter, matches::MatchRepositoryImpl, scores::ScoreRepositoryImpl,
    stats::StatsRepositoryImpl, tournaments::TournamentRepositoryImpl,
};
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::{
    config::Config,
    league_file::{LeagueFile, LeagueFileError, SeededLeague},
};

mod config;
mod league_file;
mod logs;

const USAGE: &str = "Usage: league-engine <schedule|run> <league.json>";

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    LeagueFile(#[from] LeagueFileError),
    #[error("preview failed: {0}")]
    Preview(#[from] PreviewScheduleError),
    #[error("scheduling failed: {0}")]
    CreateSchedule(#[from] CreateScheduleError),
    #[error("session {session}: {source}")]
    Session {
        session: u32,
        source: GetSessionMatchesError,
    },
    #[error("session {session} has no match {match_number}")]
    UnknownMatch { session: u32, match_number: u32 },
    #[error("score for {player:?} rejected: {source}")]
    RecordScore {
        player: String,
        source: RecordScoreError,
    },
    #[error("finalizing session {session} match {match_number} failed: {source}")]
    Finalize {
        session: u32,
        match_number: u32,
        source: FinalizeMatchError,
    },
    #[error("standings: {0}")]
    Standings(#[from] GetStandingsError),
    #[error("recompute: {0}")]
    Recompute(#[from] RecomputeStandingsError),
    #[error("player statistics: {0}")]
    PlayerStatistics(#[from] GetPlayerStatisticsError),
    #[error("summary: {0}")]
    Summary(#[from] GetTournamentSummaryError),
    #[error("could not write output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct PlayerLine {
    player: String,
    team: String,
    #[serde(flatten)]
    stats: PlayerStatistics,
}

#[derive(Serialize)]
struct RunReport {
    schedule: CreatedSchedule,
    standings: Vec<TeamStatistics>,
    players: Vec<PlayerLine>,
    summary: league_app::workflow::standings::summary::TournamentSummary,
    drifted_teams: Vec<TeamId>,
}

struct Engine {
    app: Application,
    tournaments: Arc<TournamentRepositoryImpl>,
    config: Config,
}

impl Engine {
    fn new(config: Config) -> Self {
        let tournaments = Arc::new(TournamentRepositoryImpl::new());
        let app = build_application(
            tournaments.clone(),
            Arc::new(MatchRepositoryImpl::new()),
            Arc::new(ScoreRepositoryImpl::new()),
            Arc::new(StatsRepositoryImpl::new()),
            Arc::new(MatchLockAdapter::new()),
            config.scoring_rules,
        );
        Self {
            app,
            tournaments,
            config,
        }
    }

    async fn preview(&self, file: &LeagueFile) -> Result<String, CommandError> {
        let league = file.seed(&self.tournaments)?;
        let preview = self
            .app
            .schedule_preview_use_case
            .preview_schedule(league.tournament_id, file.override_ids(&league)?)
            .await?;
        if !preview.report.is_valid {
            log::warn!("Schedule has {} issue(s)", preview.report.issues.len());
        }
        Ok(serde_json::to_string_pretty(&preview)?)
    }

    async fn run(&self, file: &LeagueFile) -> Result<String, CommandError> {
        let league = file.seed(&self.tournaments)?;
        let schedule = self
            .app
            .schedule_create_use_case
            .create_schedule(
                league.tournament_id,
                CreateScheduleRequest {
                    start_date: file.start_date,
                    days_between_sessions: file
                        .days_between_sessions
                        .unwrap_or(self.config.days_between_sessions),
                    override_order: file.override_ids(&league)?,
                    force_create: file.force_create,
                },
            )
            .await?;

        for result in &file.results {
            self.play(&league, result).await?;
        }

        let reconciliation = self
            .app
            .standings_recompute_use_case
            .recompute_standings(league.tournament_id)
            .await?;
        let standings = self
            .app
            .standings_get_use_case
            .get_standings(league.tournament_id)
            .await?;
        let players = self
            .app
            .player_statistics_use_case
            .get_player_statistics(league.tournament_id)
            .await?
            .into_iter()
            .map(|stats| PlayerLine {
                player: league.player_name(stats.player_id).unwrap_or_default().to_string(),
                team: league.team_name(stats.team_id).unwrap_or_default().to_string(),
                stats,
            })
            .collect();
        let summary = self
            .app
            .tournament_summary_use_case
            .get_tournament_summary(league.tournament_id)
            .await?;

        let report = RunReport {
            schedule,
            standings,
            players,
            summary,
            drifted_teams: reconciliation.drifted_teams,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    async fn play(
        &self,
        league: &SeededLeague,
        result: &league_file::ResultEntry,
    ) -> Result<(), CommandError> {
        let session = self
            .app
            .schedule_session_use_case
            .get_session_matches(league.tournament_id, result.session)
            .await
            .map_err(|source| CommandError::Session {
                session: result.session,
                source,
            })?;
        let Some(scheduled) = session
            .matches
            .iter()
            .find(|m| m.match_number == result.match_number)
        else {
            return Err(CommandError::UnknownMatch {
                session: result.session,
                match_number: result.match_number,
            });
        };

        for score in &result.scores {
            let submission = ScoreSubmission {
                match_id: scheduled.id,
                player_id: league.player_id(&score.team, &score.player)?,
                team_id: league.team_id(&score.team)?,
                game1: score.games[0],
                game2: score.games[1],
                game3: score.games[2],
                handicap: score.handicap,
            };
            self.app
                .score_record_use_case
                .record_score(submission)
                .await
                .map_err(|source| CommandError::RecordScore {
                    player: score.player.clone(),
                    source,
                })?;
        }

        if result.finalize {
            self.app
                .match_finalize_use_case
                .finalize_match(scheduled.id)
                .await
                .map_err(|source| CommandError::Finalize {
                    session: result.session,
                    match_number: result.match_number,
                    source,
                })?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!(
        "Series point basis {:?}, {} days between sessions",
        config.scoring_rules.series_basis, config.days_between_sessions
    );

    let file = match LeagueFile::load(&args[2]) {
        Ok(file) => file,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let engine = Engine::new(config);
    let output = match args[1].as_str() {
        "schedule" => engine.preview(&file).await,
        "run" => engine.run(&file).await,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
