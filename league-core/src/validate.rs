use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Schedule, TeamId, schedule::expected_pairings};

/// One problem found in a schedule. Problems are data, a caller may still
/// decide to use a schedule that has them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleIssue {
    InsufficientTeams {
        team_count: usize,
    },
    SelfPairing {
        session: u32,
        team: TeamId,
    },
    UnknownTeam {
        session: u32,
        team: TeamId,
    },
    TeamRepeated {
        session: u32,
        team: TeamId,
    },
    ByeConflict {
        session: u32,
        team: TeamId,
    },
    IncompleteSession {
        session: u32,
        teams_playing: usize,
        expected: usize,
    },
    DuplicatePairing {
        first: TeamId,
        second: TeamId,
        sessions: Vec<u32>,
    },
    MissingPairing {
        first: TeamId,
        second: TeamId,
    },
    IncompleteRoundRobin {
        actual: usize,
        expected: usize,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ScheduleIssue>,
    pub is_valid: bool,
}

impl ValidationReport {
    fn from_issues(issues: Vec<ScheduleIssue>) -> Self {
        let is_valid = issues.is_empty();
        Self { issues, is_valid }
    }
}

/// Checks a schedule for `team_count` teams whose identities are taken from the
/// schedule itself. Missing pairs can only be named when every team shows up
/// somewhere; otherwise the shortfall is reported as a count.
pub fn validate_schedule(schedule: &Schedule, team_count: usize) -> ValidationReport {
    let mut issues = Vec::new();
    if team_count < 2 {
        issues.push(ScheduleIssue::InsufficientTeams { team_count });
    }

    let mut seen: BTreeSet<TeamId> = BTreeSet::new();
    for session in &schedule.sessions {
        for pairing in &session.pairings {
            seen.insert(pairing.home);
            seen.insert(pairing.away);
        }
        seen.extend(session.bye);
    }

    check_sessions(schedule, team_count, None, &mut issues);
    let covered = check_duplicates(schedule, &mut issues);

    if seen.len() == team_count {
        check_missing(&seen, &covered, &mut issues);
    } else {
        let expected = expected_pairings(team_count);
        if covered.len() != expected {
            issues.push(ScheduleIssue::IncompleteRoundRobin {
                actual: covered.len(),
                expected,
            });
        }
    }

    ValidationReport::from_issues(issues)
}

/// Checks a schedule against an explicit roster. Teams outside the roster are
/// reported, and every missing pair is named.
pub fn validate_schedule_against(schedule: &Schedule, roster: &[TeamId]) -> ValidationReport {
    let mut issues = Vec::new();
    let teams: BTreeSet<TeamId> = roster.iter().copied().collect();
    if teams.len() < 2 {
        issues.push(ScheduleIssue::InsufficientTeams {
            team_count: teams.len(),
        });
    }

    check_sessions(schedule, teams.len(), Some(&teams), &mut issues);
    let covered = check_duplicates(schedule, &mut issues);
    check_missing(&teams, &covered, &mut issues);

    ValidationReport::from_issues(issues)
}

fn check_sessions(
    schedule: &Schedule,
    team_count: usize,
    roster: Option<&BTreeSet<TeamId>>,
    issues: &mut Vec<ScheduleIssue>,
) {
    let expected = team_count - team_count % 2;

    for session in &schedule.sessions {
        let mut playing: HashSet<TeamId> = HashSet::new();
        for pairing in &session.pairings {
            if pairing.home == pairing.away {
                issues.push(ScheduleIssue::SelfPairing {
                    session: session.number,
                    team: pairing.home,
                });
            }
            for team in [pairing.home, pairing.away] {
                if let Some(roster) = roster
                    && !roster.contains(&team)
                {
                    issues.push(ScheduleIssue::UnknownTeam {
                        session: session.number,
                        team,
                    });
                }
            }
            if !playing.insert(pairing.home) {
                issues.push(ScheduleIssue::TeamRepeated {
                    session: session.number,
                    team: pairing.home,
                });
            }
            if pairing.away != pairing.home && !playing.insert(pairing.away) {
                issues.push(ScheduleIssue::TeamRepeated {
                    session: session.number,
                    team: pairing.away,
                });
            }
        }

        if let Some(bye) = session.bye
            && playing.contains(&bye)
        {
            issues.push(ScheduleIssue::ByeConflict {
                session: session.number,
                team: bye,
            });
        }

        if playing.len() != expected {
            issues.push(ScheduleIssue::IncompleteSession {
                session: session.number,
                teams_playing: playing.len(),
                expected,
            });
        }
    }
}

/// Reports each pair seen in more than one session and returns all pairs seen.
fn check_duplicates(
    schedule: &Schedule,
    issues: &mut Vec<ScheduleIssue>,
) -> HashSet<(TeamId, TeamId)> {
    let mut sessions_by_pair: HashMap<(TeamId, TeamId), Vec<u32>> = HashMap::new();
    let mut first_seen = Vec::new();
    for pairing in schedule.pairings() {
        if pairing.home == pairing.away {
            continue;
        }
        let entry = sessions_by_pair.entry(pairing.key()).or_default();
        if entry.is_empty() {
            first_seen.push(pairing.key());
        }
        entry.push(pairing.session);
    }

    for key in first_seen {
        let sessions = &sessions_by_pair[&key];
        if sessions.len() > 1 {
            issues.push(ScheduleIssue::DuplicatePairing {
                first: key.0,
                second: key.1,
                sessions: sessions.clone(),
            });
        }
    }

    sessions_by_pair.into_keys().collect()
}

fn check_missing(
    teams: &BTreeSet<TeamId>,
    covered: &HashSet<(TeamId, TeamId)>,
    issues: &mut Vec<ScheduleIssue>,
) {
    let teams: Vec<TeamId> = teams.iter().copied().collect();
    for (i, first) in teams.iter().enumerate() {
        for second in &teams[i + 1..] {
            if !covered.contains(&(*first, *second)) {
                issues.push(ScheduleIssue::MissingPairing {
                    first: *first,
                    second: *second,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pairing, ScheduleSession, Team, generate_schedule};

    fn roster(n: usize) -> Vec<Team> {
        (0..n)
            .map(|i| Team::new(TeamId::new(), format!("Team {}", i + 1), None))
            .collect()
    }

    fn ids(teams: &[Team]) -> Vec<TeamId> {
        teams.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_generated_schedules_are_valid() {
        for n in 2..=12 {
            let teams = roster(n);
            let schedule = generate_schedule(&teams).unwrap();

            let report = validate_schedule(&schedule, n);
            assert!(report.is_valid, "n = {}: {:?}", n, report.issues);
            assert!(report.issues.is_empty());

            let report = validate_schedule_against(&schedule, &ids(&teams));
            assert!(report.is_valid, "n = {}: {:?}", n, report.issues);
        }
    }

    #[test]
    fn test_detects_repeated_team_and_duplicate_pairing() {
        let teams = roster(4);
        let t = ids(&teams);
        let mut schedule = generate_schedule(&teams).unwrap();

        // Session 2 replays the session 1 pairing of the first two seats.
        let replay = Pairing {
            session: 2,
            match_number: 3,
            ..schedule.sessions[0].pairings[0]
        };
        schedule.sessions[1].pairings.push(replay);

        let report = validate_schedule_against(&schedule, &t);
        assert!(!report.is_valid);
        assert!(report.issues.iter().any(|i| matches!(
            i,
            ScheduleIssue::TeamRepeated { session: 2, .. }
        )));
        assert!(report.issues.iter().any(|i| matches!(
            i,
            ScheduleIssue::DuplicatePairing { sessions, .. } if sessions == &vec![1, 2]
        )));
    }

    #[test]
    fn test_detects_missing_pairing_and_incomplete_session() {
        let teams = roster(4);
        let t = ids(&teams);
        let mut schedule = generate_schedule(&teams).unwrap();
        let dropped = schedule.sessions[2].pairings.pop().unwrap();

        let report = validate_schedule(&schedule, 4);
        assert_eq!(
            report.issues,
            vec![
                ScheduleIssue::IncompleteSession {
                    session: 3,
                    teams_playing: 2,
                    expected: 4,
                },
                ScheduleIssue::MissingPairing {
                    first: dropped.key().0,
                    second: dropped.key().1,
                },
            ]
        );

        let report = validate_schedule_against(&schedule, &t);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_counts_shortfall_when_teams_never_appear() {
        let teams = roster(2);
        let schedule = generate_schedule(&teams).unwrap();

        let report = validate_schedule(&schedule, 4);
        assert!(report.issues.contains(&ScheduleIssue::IncompleteRoundRobin {
            actual: 1,
            expected: 6,
        }));
    }

    #[test]
    fn test_detects_bye_conflict_and_unknown_team() {
        let teams = roster(3);
        let t = ids(&teams);
        let stranger = TeamId::new();
        let schedule = Schedule {
            sessions: vec![ScheduleSession {
                number: 1,
                pairings: vec![Pairing {
                    session: 1,
                    match_number: 1,
                    home: t[0],
                    away: stranger,
                }],
                bye: Some(t[0]),
            }],
        };

        let report = validate_schedule_against(&schedule, &t);
        assert!(report.issues.contains(&ScheduleIssue::UnknownTeam {
            session: 1,
            team: stranger,
        }));
        assert!(report.issues.contains(&ScheduleIssue::ByeConflict {
            session: 1,
            team: t[0],
        }));
    }

    #[test]
    fn test_insufficient_teams_is_an_issue() {
        let report = validate_schedule(&Schedule::default(), 1);
        assert_eq!(
            report.issues,
            vec![ScheduleIssue::InsufficientTeams { team_count: 1 }]
        );
        assert!(!report.is_valid);
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let teams = roster(5);
        let schedule = generate_schedule(&teams).unwrap();
        let copy = schedule.clone();
        validate_schedule(&schedule, 5);
        assert_eq!(schedule, copy);
    }
}
