use dashmap::DashMap;
use league_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, TournamentId,
    r#match::{Match, MatchRepository},
};
use league_core::MatchId;

pub struct MatchRepositoryImpl {
    matches: DashMap<MatchId, Match>,
    by_tournament: DashMap<TournamentId, Vec<MatchId>>,
}

impl MatchRepositoryImpl {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
            by_tournament: DashMap::new(),
        }
    }
}

#[async_trait::async_trait]
impl MatchRepository for MatchRepositoryImpl {
    async fn create_matches(
        &self,
        tournament_id: TournamentId,
        matches: Vec<Match>,
    ) -> Result<(), RepoCreateError> {
        // The tournament entry stays locked until every match is in place.
        let mut ids = self.by_tournament.entry(tournament_id).or_default();
        if !ids.is_empty() {
            return Err(RepoCreateError::Conflict);
        }
        for scheduled in matches {
            ids.push(scheduled.id);
            self.matches.insert(scheduled.id, scheduled);
        }
        Ok(())
    }

    async fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, RepoError> {
        let ids = match self.by_tournament.get(&tournament_id) {
            Some(ids) => ids.clone(),
            None => return Ok(Vec::new()),
        };
        let mut matches: Vec<Match> = ids
            .iter()
            .filter_map(|id| self.matches.get(id).map(|m| m.clone()))
            .collect();
        matches.sort_by_key(|m| (m.session_number, m.match_number));
        Ok(matches)
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Match, RepoRetrieveError> {
        self.matches
            .get(&match_id)
            .map(|m| m.clone())
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn delete_matches(&self, tournament_id: TournamentId) -> Result<usize, RepoError> {
        let Some((_, ids)) = self.by_tournament.remove(&tournament_id) else {
            return Ok(0);
        };
        Ok(ids
            .iter()
            .filter(|id| self.matches.remove(*id).is_some())
            .count())
    }

    async fn update_match<R: Send + 'static>(
        &self,
        match_id: MatchId,
        update_fn: impl for<'a> FnOnce(&'a mut Match) -> R + Send + 'static,
    ) -> Result<R, RepoUpdateError> {
        let Some(mut stored) = self.matches.get_mut(&match_id) else {
            return Err(RepoUpdateError::NotFound);
        };
        Ok(update_fn(&mut stored))
    }
}
