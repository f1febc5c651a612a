use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    GAMES_PER_SERIES, MatchId, MatchOutcome, POINTS_PER_MATCH, PlayerGameScore, PlayerId, Team,
    TeamId, TeamResult,
};

/// Cumulative results of one team in a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team_id: TeamId,
    pub team_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_tied: u32,
    pub games_played: u32,
    pub total_score: u64,
    pub total_points: u32,
    pub average: f64,
    pub points_percentage: f64,
    pub rank: u32,
}

impl TeamStatistics {
    pub fn new(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_tied: 0,
            games_played: 0,
            total_score: 0,
            total_points: 0,
            average: 0.0,
            points_percentage: 0.0,
            rank: 0,
        }
    }

    /// Adds one match to the totals. Returns false, changing nothing, when the
    /// team did not play in it.
    pub fn apply_outcome(&mut self, outcome: &MatchOutcome) -> bool {
        let Some(side) = outcome.side_of(self.team_id) else {
            return false;
        };
        self.matches_played += 1;
        match outcome.result_for(side) {
            TeamResult::Win => self.matches_won += 1,
            TeamResult::Loss => self.matches_lost += 1,
            TeamResult::Tie => self.matches_tied += 1,
        }
        self.games_played += GAMES_PER_SERIES as u32;
        self.total_score += outcome.team_score(side).final_score();
        self.total_points += outcome.points_for(side);
        self.refresh_derived();
        true
    }

    fn refresh_derived(&mut self) {
        self.average = if self.games_played > 0 {
            self.total_score as f64 / self.games_played as f64
        } else {
            0.0
        };
        let available = self.matches_played * POINTS_PER_MATCH;
        self.points_percentage = if available > 0 {
            self.total_points as f64 / available as f64 * 100.0
        } else {
            0.0
        };
    }

    /// True when the counters agree, ignoring rank and the display name.
    pub fn same_totals(&self, other: &TeamStatistics) -> bool {
        self.team_id == other.team_id
            && self.matches_played == other.matches_played
            && self.matches_won == other.matches_won
            && self.matches_lost == other.matches_lost
            && self.matches_tied == other.matches_tied
            && self.games_played == other.games_played
            && self.total_score == other.total_score
            && self.total_points == other.total_points
    }
}

/// Orders by points, then total score, both descending, then team name and id,
/// and numbers the result 1..=n. Every team gets a distinct rank.
pub fn rank_standings(standings: &mut [TeamStatistics]) {
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.total_score.cmp(&a.total_score))
            .then_with(|| a.team_name.cmp(&b.team_name))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
    for (index, stats) in standings.iter_mut().enumerate() {
        stats.rank = index as u32 + 1;
    }
}

/// Folds a complete match history into a fresh, ranked table. Outcomes naming
/// teams outside `teams` are ignored for those teams.
pub fn recompute_standings(teams: &[Team], history: &[MatchOutcome]) -> Vec<TeamStatistics> {
    let mut standings: Vec<TeamStatistics> = teams.iter().map(TeamStatistics::new).collect();
    for outcome in history {
        for stats in standings.iter_mut() {
            stats.apply_outcome(outcome);
        }
    }
    rank_standings(&mut standings);
    standings
}

/// Teams whose totals differ between two tables, plus teams present in only one.
pub fn standings_drift(expected: &[TeamStatistics], actual: &[TeamStatistics]) -> Vec<TeamId> {
    let mut drifted = Vec::new();
    for stats in expected {
        match actual.iter().find(|s| s.team_id == stats.team_id) {
            Some(other) if other.same_totals(stats) => {}
            _ => drifted.push(stats.team_id),
        }
    }
    for stats in actual {
        if !expected.iter().any(|s| s.team_id == stats.team_id) {
            drifted.push(stats.team_id);
        }
    }
    drifted
}

/// The stored standings of a tournament and every outcome folded into them.
///
/// Applying and rebuilding both go through the table, so a match is counted
/// once whichever of the two sees it first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsTable {
    pub standings: Vec<TeamStatistics>,
    pub applied: BTreeMap<MatchId, MatchOutcome>,
}

impl StandingsTable {
    pub fn is_applied(&self, match_id: MatchId) -> bool {
        self.applied.contains_key(&match_id)
    }

    pub fn team(&self, team_id: TeamId) -> Option<&TeamStatistics> {
        self.standings.iter().find(|s| s.team_id == team_id)
    }

    /// Adds one match to both teams' rows and re-ranks. Returns false, changing
    /// nothing, when the match is already in the table.
    pub fn apply(&mut self, home: &Team, away: &Team, outcome: &MatchOutcome) -> bool {
        if self.is_applied(outcome.match_id) {
            return false;
        }
        for team in [home, away] {
            let index = match self.standings.iter().position(|s| s.team_id == team.id) {
                Some(index) => index,
                None => {
                    self.standings.push(TeamStatistics::new(team));
                    self.standings.len() - 1
                }
            };
            self.standings[index].apply_outcome(outcome);
        }
        self.applied.insert(outcome.match_id, outcome.clone());
        rank_standings(&mut self.standings);
        true
    }

    /// Replaces the rows with a fold of `history` plus any outcome applied but
    /// missing from it, and returns the rows it replaced. History wins when
    /// both hold the same match.
    pub fn rebuild(&mut self, teams: &[Team], history: &[MatchOutcome]) -> Vec<TeamStatistics> {
        let mut outcomes: BTreeMap<MatchId, MatchOutcome> = history
            .iter()
            .map(|outcome| (outcome.match_id, outcome.clone()))
            .collect();
        for (match_id, outcome) in &self.applied {
            outcomes.entry(*match_id).or_insert_with(|| outcome.clone());
        }
        let folded: Vec<MatchOutcome> = outcomes.values().cloned().collect();
        self.applied = outcomes;
        std::mem::replace(&mut self.standings, recompute_standings(teams, &folded))
    }
}

/// Scratch bowling figures of one player across a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub matches_played: u32,
    pub games_played: u32,
    pub total_pins: u64,
    pub average: f64,
    pub highest_game: u32,
    pub highest_series: u32,
}

pub fn player_statistics<'a>(
    scores: impl IntoIterator<Item = &'a PlayerGameScore>,
) -> Vec<PlayerStatistics> {
    let mut by_player: BTreeMap<PlayerId, PlayerStatistics> = BTreeMap::new();
    for score in scores {
        let stats = by_player
            .entry(score.player_id)
            .or_insert_with(|| PlayerStatistics {
                player_id: score.player_id,
                team_id: score.team_id,
                matches_played: 0,
                games_played: 0,
                total_pins: 0,
                average: 0.0,
                highest_game: 0,
                highest_series: 0,
            });
        stats.matches_played += 1;
        stats.games_played += GAMES_PER_SERIES as u32;
        stats.total_pins += score.series_total() as u64;
        stats.highest_game = stats.highest_game.max(score.highest_game());
        stats.highest_series = stats.highest_series.max(score.series_total());
        stats.average = stats.total_pins as f64 / stats.games_played as f64;
    }

    let mut players: Vec<PlayerStatistics> = by_player.into_values().collect();
    players.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| b.total_pins.cmp(&a.total_pins))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    players
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub games_bowled: u32,
    pub highest_game: u32,
    pub highest_series: u32,
    pub average_game: f64,
}

pub fn score_summary<'a>(scores: impl IntoIterator<Item = &'a PlayerGameScore>) -> ScoreSummary {
    let mut summary = ScoreSummary::default();
    let mut pins: u64 = 0;
    for score in scores {
        summary.games_bowled += GAMES_PER_SERIES as u32;
        summary.highest_game = summary.highest_game.max(score.highest_game());
        summary.highest_series = summary.highest_series.max(score.series_total());
        pins += score.series_total() as u64;
    }
    if summary.games_bowled > 0 {
        summary.average_game = pins as f64 / summary.games_bowled as f64;
    }
    summary
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{MatchRoster, ScoreSheet, ScoringRules};

    struct League {
        teams: Vec<Team>,
        players: Vec<PlayerId>,
    }

    fn league(n: usize) -> League {
        League {
            teams: (0..n)
                .map(|i| Team::new(TeamId::new(), format!("Team {}", i + 1), None))
                .collect(),
            players: (0..n).map(|_| PlayerId::new()).collect(),
        }
    }

    fn play(
        league: &League,
        home: usize,
        away: usize,
        home_games: [u32; 3],
        away_games: [u32; 3],
    ) -> MatchOutcome {
        let (h, a) = (league.teams[home].id, league.teams[away].id);
        let mut sheet = ScoreSheet::new(MatchId::new(), h, a);
        let roster = MatchRoster {
            home: h,
            away: a,
            home_players: HashSet::from([league.players[home]]),
            away_players: HashSet::from([league.players[away]]),
        };
        let hs = PlayerGameScore::new(sheet.match_id, league.players[home], h, home_games, None)
            .unwrap();
        let aws = PlayerGameScore::new(sheet.match_id, league.players[away], a, away_games, None)
            .unwrap();
        sheet.record(hs, &roster).unwrap();
        sheet.record(aws, &roster).unwrap();
        sheet.compute_outcome(ScoringRules::default()).unwrap()
    }

    fn history(l: &League) -> Vec<MatchOutcome> {
        vec![
            play(l, 0, 1, [200, 200, 200], [150, 150, 150]),
            play(l, 2, 3, [180, 170, 160], [160, 170, 180]),
            play(l, 0, 2, [190, 150, 210], [200, 160, 170]),
            play(l, 1, 3, [120, 130, 140], [220, 230, 240]),
            play(l, 0, 3, [150, 150, 150], [150, 150, 150]),
            play(l, 1, 2, [210, 200, 190], [140, 150, 160]),
        ]
    }

    #[test]
    fn test_apply_outcome_updates_both_sides() {
        let l = league(2);
        let outcome = play(&l, 0, 1, [200, 200, 200], [150, 150, 150]);
        let mut home = TeamStatistics::new(&l.teams[0]);
        let mut away = TeamStatistics::new(&l.teams[1]);
        assert!(home.apply_outcome(&outcome));
        assert!(away.apply_outcome(&outcome));

        assert_eq!((home.matches_won, home.matches_lost), (1, 0));
        assert_eq!((away.matches_won, away.matches_lost), (0, 1));
        assert_eq!(home.total_points, 4);
        assert_eq!(home.total_score, 600);
        assert_eq!(home.games_played, 3);
        assert!((home.average - 200.0).abs() < 1e-9);
        assert!((home.points_percentage - 100.0).abs() < 1e-9);
        assert!((away.points_percentage - 0.0).abs() < 1e-9);

        let mut bystander = TeamStatistics::new(&Team::new(TeamId::new(), "Idle", None));
        assert!(!bystander.apply_outcome(&outcome));
        assert_eq!(bystander.matches_played, 0);
    }

    #[test]
    fn test_tie_counts_neither_win_nor_loss() {
        let l = league(2);
        let outcome = play(&l, 0, 1, [150, 150, 150], [150, 150, 150]);
        let mut stats = TeamStatistics::new(&l.teams[0]);
        stats.apply_outcome(&outcome);
        assert_eq!(stats.matches_played, 1);
        assert_eq!((stats.matches_won, stats.matches_lost, stats.matches_tied), (0, 0, 1));
    }

    #[test]
    fn test_incremental_matches_recompute_in_any_order() {
        let l = league(4);
        let matches = history(&l);
        let recomputed = recompute_standings(&l.teams, &matches);

        let orders: [[usize; 6]; 3] = [
            [0, 1, 2, 3, 4, 5],
            [5, 4, 3, 2, 1, 0],
            [3, 0, 5, 1, 4, 2],
        ];
        for order in orders {
            let mut table: Vec<TeamStatistics> = l.teams.iter().map(TeamStatistics::new).collect();
            for index in order {
                for stats in table.iter_mut() {
                    stats.apply_outcome(&matches[index]);
                }
                rank_standings(&mut table);
            }
            assert_eq!(table, recomputed);
            assert!(standings_drift(&recomputed, &table).is_empty());
        }
    }

    #[test]
    fn test_rank_breaks_ties_by_score_then_name() {
        let l = league(3);
        let mut table: Vec<TeamStatistics> = l.teams.iter().map(TeamStatistics::new).collect();
        table[0].total_points = 8;
        table[0].total_score = 1500;
        table[1].total_points = 8;
        table[1].total_score = 1600;
        table[2].total_points = 8;
        table[2].total_score = 1600;
        table[2].team_name = "Aardvarks".into();

        rank_standings(&mut table);
        let order: Vec<(u32, &str)> = table
            .iter()
            .map(|s| (s.rank, s.team_name.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "Aardvarks"), (2, "Team 2"), (3, "Team 1")]);
    }

    #[test]
    fn test_drift_detection() {
        let l = league(4);
        let matches = history(&l);
        let recomputed = recompute_standings(&l.teams, &matches);
        let mut stale = recompute_standings(&l.teams, &matches[..5]);
        rank_standings(&mut stale);

        let drifted = standings_drift(&recomputed, &stale);
        let mut expected = vec![l.teams[1].id, l.teams[2].id];
        expected.sort();
        let mut drifted_sorted = drifted.clone();
        drifted_sorted.sort();
        assert_eq!(drifted_sorted, expected);
    }

    #[test]
    fn test_table_applies_each_match_once() {
        let l = league(4);
        let matches = history(&l);
        let mut table = StandingsTable::default();

        assert!(table.apply(&l.teams[0], &l.teams[1], &matches[0]));
        assert!(!table.apply(&l.teams[0], &l.teams[1], &matches[0]));
        assert_eq!(table.team(l.teams[0].id).unwrap().matches_played, 1);
        assert_eq!(table.team(l.teams[1].id).unwrap().matches_played, 1);
        assert!(table.is_applied(matches[0].match_id));
        assert_eq!(table.standings.len(), 2);
    }

    #[test]
    fn test_rebuild_then_apply_counts_match_once() {
        let l = league(4);
        let matches = history(&l);
        let mut table = StandingsTable::default();

        // The match is already in the history when the rebuild runs, and its
        // own apply arrives afterwards.
        table.rebuild(&l.teams, &matches[..1]);
        assert!(!table.apply(&l.teams[0], &l.teams[1], &matches[0]));
        assert_eq!(table.team(l.teams[0].id).unwrap().matches_played, 1);
        assert_eq!(table.standings, recompute_standings(&l.teams, &matches[..1]));
    }

    #[test]
    fn test_rebuild_keeps_applied_matches_missing_from_history() {
        let l = league(4);
        let matches = history(&l);
        let mut table = StandingsTable::default();
        table.apply(&l.teams[0], &l.teams[1], &matches[0]);
        table.apply(&l.teams[2], &l.teams[3], &matches[1]);
        let before = table.standings.clone();

        let previous = table.rebuild(&l.teams, &matches[..1]);
        assert_eq!(previous, before);
        assert_eq!(table.standings, recompute_standings(&l.teams, &matches[..2]));
        assert_eq!(table.applied.len(), 2);
    }

    #[test]
    fn test_player_statistics_and_summary() {
        let team = TeamId::new();
        let match_a = MatchId::new();
        let match_b = MatchId::new();
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        let scores = vec![
            PlayerGameScore::new(match_a, p1, team, [200, 180, 190], Some(10)).unwrap(),
            PlayerGameScore::new(match_b, p1, team, [220, 210, 230], None).unwrap(),
            PlayerGameScore::new(match_a, p2, team, [150, 160, 170], Some(30)).unwrap(),
        ];

        let players = player_statistics(&scores);
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].player_id, p1);
        assert_eq!(players[0].matches_played, 2);
        assert_eq!(players[0].games_played, 6);
        assert_eq!(players[0].total_pins, 1230);
        assert!((players[0].average - 205.0).abs() < 1e-9);
        assert_eq!(players[0].highest_game, 230);
        assert_eq!(players[0].highest_series, 660);
        assert_eq!(players[1].player_id, p2);

        let summary = score_summary(&scores);
        assert_eq!(summary.games_bowled, 9);
        assert_eq!(summary.highest_game, 230);
        assert_eq!(summary.highest_series, 660);
        assert!((summary.average_game - 1710.0 / 9.0).abs() < 1e-9);
    }
}
