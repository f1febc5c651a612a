use league_core::{MatchOutcome, MatchRoster, ScoreError, ScoreSheet, ScoringRules};

use crate::domain::{r#match::Match, tournament::Player};

pub trait ScoringService {
    fn rules(&self) -> ScoringRules;
    fn roster(&self, scheduled: &Match, home_players: &[Player], away_players: &[Player])
    -> MatchRoster;
    fn outcome(&self, sheet: &ScoreSheet) -> Result<MatchOutcome, ScoreError>;
}

pub struct ScoringServiceImpl {
    rules: ScoringRules,
}

impl ScoringServiceImpl {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }
}

impl ScoringService for ScoringServiceImpl {
    fn rules(&self) -> ScoringRules {
        self.rules
    }

    fn roster(
        &self,
        scheduled: &Match,
        home_players: &[Player],
        away_players: &[Player],
    ) -> MatchRoster {
        // A player only counts for the side their team plays on.
        let of_team = |players: &[Player], team| {
            players
                .iter()
                .filter(|p| p.team_id == team)
                .map(|p| p.id)
                .collect()
        };
        MatchRoster {
            home: scheduled.home,
            away: scheduled.away,
            home_players: of_team(home_players, scheduled.home),
            away_players: of_team(away_players, scheduled.away),
        }
    }

    fn outcome(&self, sheet: &ScoreSheet) -> Result<MatchOutcome, ScoreError> {
        sheet.compute_outcome(self.rules)
    }
}
