use league_core::{Team, TeamStatistics};

pub mod apply;
pub mod get;
pub mod player_stats;
pub mod recompute;
pub mod summary;

/// Adds zeroed rows for registered teams that have not played yet.
fn complete_table(teams: &[Team], mut table: Vec<TeamStatistics>) -> Vec<TeamStatistics> {
    for team in teams {
        if !table.iter().any(|s| s.team_id == team.id) {
            table.push(TeamStatistics::new(team));
        }
    }
    table
}
