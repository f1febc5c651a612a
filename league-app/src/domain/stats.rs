use league_core::{StandingsTable, TeamStatistics};

use crate::domain::{RepoError, RepoUpdateError, TournamentId};

#[async_trait::async_trait]
pub trait StatsRepository {
    async fn list_team_stats(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TeamStatistics>, RepoError>;

    /// Runs `update_fn` on the table of a tournament, excluding every other
    /// writer for its duration. A tournament without a table starts empty.
    async fn update_standings<R: Send + 'static>(
        &self,
        tournament_id: TournamentId,
        update_fn: impl for<'a> FnOnce(&'a mut StandingsTable) -> R + Send + 'static,
    ) -> Result<R, RepoUpdateError>;
}
