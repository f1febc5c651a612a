mod schedule;
mod scoring;
mod standings;
mod validate;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub use schedule::{
    Pairing, Schedule, ScheduleError, ScheduleSession, ScheduleSummary, expected_pairings,
    generate_schedule, sessions_required,
};
pub use scoring::{
    GAMES_PER_SERIES, MAX_GAME_SCORE, MAX_HANDICAP, MatchOutcome, MatchPoints, MatchRoster,
    MatchState, POINTS_PER_MATCH, PlayerGameScore, PointAward, ScoreError, ScoreSheet,
    ScoringRules, SeriesBasis, Side, TeamResult, TeamScore, compute_match_points,
};
pub use standings::{
    PlayerStatistics, ScoreSummary, StandingsTable, TeamStatistics, player_statistics,
    rank_standings, recompute_standings, score_summary, standings_drift,
};
pub use validate::{
    ScheduleIssue, ValidationReport, validate_schedule, validate_schedule_against,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub uuid::Uuid);

impl TeamId {
    pub fn new() -> Self {
        TeamId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub uuid::Uuid);

impl PlayerId {
    pub fn new() -> Self {
        PlayerId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub uuid::Uuid);

impl MatchId {
    pub fn new() -> Self {
        MatchId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// A team registered for scheduling. Immutable while a schedule is generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub seed: Option<u32>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, seed: Option<u32>) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
        }
    }

    /// Seeded teams first by ascending seed, unseeded after them, then by name.
    /// The id is the last resort so the order is total.
    pub fn schedule_order(&self, other: &Team) -> Ordering {
        let by_seed = match (self.seed, other.seed) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_seed
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

pub fn order_teams(teams: &mut [Team]) {
    teams.sort_by(|a, b| a.schedule_order(b));
}

/// Reorders `teams` to follow `order`, which must name every team exactly once.
pub fn apply_override_order(teams: &[Team], order: &[TeamId]) -> Result<Vec<Team>, ScheduleError> {
    if order.len() != teams.len() {
        return Err(ScheduleError::InvalidInput(format!(
            "override order names {} teams, expected {}",
            order.len(),
            teams.len()
        )));
    }
    let mut ordered = Vec::with_capacity(teams.len());
    for team_id in order {
        if ordered.iter().any(|t: &Team| t.id == *team_id) {
            return Err(ScheduleError::InvalidInput(format!(
                "team {} appears twice in override order",
                team_id
            )));
        }
        let Some(team) = teams.iter().find(|t| t.id == *team_id) else {
            return Err(ScheduleError::InvalidInput(format!(
                "team {} in override order is not registered",
                team_id
            )));
        };
        ordered.push(team.clone());
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_teams_by_seed_then_name() {
        let a = Team::new(TeamId::new(), "Alley Cats", None);
        let b = Team::new(TeamId::new(), "Bowlers", Some(2));
        let c = Team::new(TeamId::new(), "Strikers", Some(1));
        let d = Team::new(TeamId::new(), "Aces", None);

        let mut teams = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        order_teams(&mut teams);

        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Strikers", "Bowlers", "Aces", "Alley Cats"]);
    }

    #[test]
    fn test_apply_override_order() {
        let a = Team::new(TeamId::new(), "A", Some(1));
        let b = Team::new(TeamId::new(), "B", Some(2));
        let c = Team::new(TeamId::new(), "C", Some(3));
        let teams = vec![a.clone(), b.clone(), c.clone()];

        let ordered = apply_override_order(&teams, &[c.id, a.id, b.id]).unwrap();
        assert_eq!(ordered, vec![c.clone(), a.clone(), b.clone()]);

        assert!(apply_override_order(&teams, &[c.id, a.id]).is_err());
        assert!(apply_override_order(&teams, &[c.id, c.id, a.id]).is_err());
        assert!(apply_override_order(&teams, &[c.id, a.id, TeamId::new()]).is_err());
    }
}
