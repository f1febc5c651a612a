use dashmap::DashMap;
use league_app::domain::{RepoError, RepoUpdateError, TournamentId, stats::StatsRepository};
use league_core::{StandingsTable, TeamStatistics};

/// One table per tournament. Every update holds the tournament's entry.
pub struct StatsRepositoryImpl {
    tables: DashMap<TournamentId, StandingsTable>,
}

impl StatsRepositoryImpl {
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }
}

#[async_trait::async_trait]
impl StatsRepository for StatsRepositoryImpl {
    async fn list_team_stats(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TeamStatistics>, RepoError> {
        Ok(self
            .tables
            .get(&tournament_id)
            .map(|t| t.standings.clone())
            .unwrap_or_default())
    }

    async fn update_standings<R: Send + 'static>(
        &self,
        tournament_id: TournamentId,
        update_fn: impl for<'a> FnOnce(&'a mut StandingsTable) -> R + Send + 'static,
    ) -> Result<R, RepoUpdateError> {
        let mut table = self.tables.entry(tournament_id).or_default();
        Ok(update_fn(&mut table))
    }
}
