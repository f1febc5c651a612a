use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Team, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Two distinct teams meeting in one session. Home and away are labels only,
/// the pairing itself is unordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub session: u32,
    pub match_number: u32,
    pub home: TeamId,
    pub away: TeamId,
}

impl Pairing {
    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.away == team
    }

    /// Canonical key of the unordered pair.
    pub fn key(&self) -> (TeamId, TeamId) {
        if self.home <= self.away {
            (self.home, self.away)
        } else {
            (self.away, self.home)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSession {
    pub number: u32,
    pub pairings: Vec<Pairing>,
    pub bye: Option<TeamId>,
}

impl ScheduleSession {
    pub fn teams_playing(&self) -> usize {
        self.pairings
            .iter()
            .flat_map(|p| [p.home, p.away])
            .collect::<HashSet<_>>()
            .len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub sessions: Vec<ScheduleSession>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub team_count: usize,
    pub total_pairings: usize,
    pub expected_pairings: usize,
    pub sessions_required: usize,
    pub has_odd_teams: bool,
}

pub fn expected_pairings(team_count: usize) -> usize {
    team_count * team_count.saturating_sub(1) / 2
}

pub fn sessions_required(team_count: usize) -> usize {
    if team_count % 2 == 0 {
        team_count.saturating_sub(1)
    } else {
        team_count
    }
}

impl Schedule {
    pub fn pairings(&self) -> impl Iterator<Item = &Pairing> {
        self.sessions.iter().flat_map(|s| s.pairings.iter())
    }

    pub fn total_pairings(&self) -> usize {
        self.sessions.iter().map(|s| s.pairings.len()).sum()
    }

    pub fn session(&self, number: u32) -> Option<&ScheduleSession> {
        self.sessions.iter().find(|s| s.number == number)
    }

    pub fn summary(&self, team_count: usize) -> ScheduleSummary {
        ScheduleSummary {
            team_count,
            total_pairings: self.total_pairings(),
            expected_pairings: expected_pairings(team_count),
            sessions_required: sessions_required(team_count),
            has_odd_teams: team_count % 2 == 1,
        }
    }

    /// Rebuilds a schedule from stored pairings. Sessions are ordered by number,
    /// pairings by match number. When the roster is odd and exactly one rostered
    /// team is absent from a session, that team is the session's bye.
    pub fn from_pairings(pairings: impl IntoIterator<Item = Pairing>, roster: &[TeamId]) -> Self {
        let mut grouped: BTreeMap<u32, Vec<Pairing>> = BTreeMap::new();
        for pairing in pairings {
            grouped.entry(pairing.session).or_default().push(pairing);
        }

        let sessions = grouped
            .into_iter()
            .map(|(number, mut pairings)| {
                pairings.sort_by_key(|p| p.match_number);
                let bye = if roster.len() % 2 == 1 {
                    let mut absent = roster
                        .iter()
                        .filter(|t| !pairings.iter().any(|p| p.involves(**t)));
                    match (absent.next(), absent.next()) {
                        (Some(team), None) => Some(*team),
                        _ => None,
                    }
                } else {
                    None
                };
                ScheduleSession {
                    number,
                    pairings,
                    bye,
                }
            })
            .collect();

        Schedule { sessions }
    }
}

/// The circle layout: slot 0 stays put, the other slots form a ring that turns
/// one step per session. `None` is the placeholder that pads an odd field.
struct Ring<'a> {
    fixed: Option<TeamId>,
    ring: &'a [Option<TeamId>],
    offset: usize,
}

impl<'a> Ring<'a> {
    fn new(slots: &'a [Option<TeamId>]) -> Self {
        Self {
            fixed: slots[0],
            ring: &slots[1..],
            offset: 0,
        }
    }

    fn len(&self) -> usize {
        self.ring.len() + 1
    }

    fn rotate_to(&mut self, session: usize) {
        self.offset = session % self.ring.len();
    }

    fn at(&self, position: usize) -> Option<TeamId> {
        if position == 0 {
            return self.fixed;
        }
        let len = self.ring.len();
        self.ring[(position - 1 + len - self.offset) % len]
    }
}

/// Round-robin schedule by the circle method. The input order is the seating
/// order, so callers sort (or override) before calling. Identical input always
/// yields an identical schedule.
pub fn generate_schedule(teams: &[Team]) -> Result<Schedule, ScheduleError> {
    if teams.len() < 2 {
        return Err(ScheduleError::InvalidInput(format!(
            "at least 2 teams are required for a round robin, got {}",
            teams.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = teams.iter().find(|t| !seen.insert(t.id)) {
        return Err(ScheduleError::InvalidInput(format!(
            "team {} is listed more than once",
            dup.id
        )));
    }

    let mut slots: Vec<Option<TeamId>> = teams.iter().map(|t| Some(t.id)).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let mut ring = Ring::new(&slots);
    let slot_count = ring.len();
    let session_count = slot_count - 1;
    let mut sessions = Vec::with_capacity(session_count);

    for session_index in 0..session_count {
        ring.rotate_to(session_index);
        let number = session_index as u32 + 1;
        let mut pairings = Vec::with_capacity(slot_count / 2);
        let mut bye = None;

        for position in 0..slot_count / 2 {
            match (ring.at(position), ring.at(slot_count - 1 - position)) {
                (Some(home), Some(away)) => pairings.push(Pairing {
                    session: number,
                    match_number: pairings.len() as u32 + 1,
                    home,
                    away,
                }),
                (Some(team), None) | (None, Some(team)) => bye = Some(team),
                (None, None) => {}
            }
        }

        sessions.push(ScheduleSession {
            number,
            pairings,
            bye,
        });
    }

    Ok(Schedule { sessions })
}
