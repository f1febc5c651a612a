use chrono::{Days, NaiveDate};
use league_core::{
    Schedule, ScheduleError, Team, TeamId, ValidationReport, apply_override_order,
    generate_schedule, order_teams, validate_schedule_against,
};

pub trait SchedulingService {
    /// Seats the teams (override order if given, seed/name order otherwise) and
    /// generates the round robin.
    fn plan(
        &self,
        teams: Vec<Team>,
        override_order: Option<&[TeamId]>,
    ) -> Result<Schedule, ScheduleError>;
    fn check(&self, schedule: &Schedule, teams: &[Team]) -> ValidationReport;
    fn session_date(
        &self,
        start_date: Option<NaiveDate>,
        session: u32,
        days_between_sessions: u32,
    ) -> Option<NaiveDate>;
}

pub struct SchedulingServiceImpl;

impl SchedulingServiceImpl {
    pub fn new() -> Self {
        Self {}
    }
}

impl SchedulingService for SchedulingServiceImpl {
    fn plan(
        &self,
        mut teams: Vec<Team>,
        override_order: Option<&[TeamId]>,
    ) -> Result<Schedule, ScheduleError> {
        let seated = match override_order {
            Some(order) => apply_override_order(&teams, order)?,
            None => {
                order_teams(&mut teams);
                teams
            }
        };
        generate_schedule(&seated)
    }

    fn check(&self, schedule: &Schedule, teams: &[Team]) -> ValidationReport {
        let roster: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        validate_schedule_against(schedule, &roster)
    }

    fn session_date(
        &self,
        start_date: Option<NaiveDate>,
        session: u32,
        days_between_sessions: u32,
    ) -> Option<NaiveDate> {
        let offset = session.saturating_sub(1) as u64 * days_between_sessions as u64;
        start_date?.checked_add_days(Days::new(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, seed: Option<u32>) -> Team {
        Team::new(TeamId::new(), name, seed)
    }

    #[test]
    fn test_plan_uses_seed_order_by_default() {
        let service = SchedulingServiceImpl::new();
        let a = team("A", Some(1));
        let b = team("B", Some(2));
        let c = team("C", Some(3));
        let d = team("D", Some(4));

        let schedule = service
            .plan(vec![d.clone(), b.clone(), a.clone(), c.clone()], None)
            .unwrap();
        let first = &schedule.sessions[0].pairings[0];
        assert_eq!((first.home, first.away), (a.id, d.id));
    }

    #[test]
    fn test_plan_with_override_order() {
        let service = SchedulingServiceImpl::new();
        let a = team("A", Some(1));
        let b = team("B", Some(2));
        let c = team("C", Some(3));
        let d = team("D", Some(4));
        let teams = vec![a.clone(), b.clone(), c.clone(), d.clone()];

        let schedule = service
            .plan(teams.clone(), Some(&[c.id, a.id, d.id, b.id]))
            .unwrap();
        let first = &schedule.sessions[0].pairings[0];
        assert_eq!((first.home, first.away), (c.id, b.id));

        assert!(service.plan(teams, Some(&[c.id, a.id])).is_err());
    }

    #[test]
    fn test_check_reports_generated_schedule_valid() {
        let service = SchedulingServiceImpl::new();
        let teams: Vec<Team> = (0..6).map(|i| team(&format!("T{}", i), None)).collect();
        let schedule = service.plan(teams.clone(), None).unwrap();
        assert!(service.check(&schedule, &teams).is_valid);
    }

    #[test]
    fn test_session_dates() {
        let service = SchedulingServiceImpl::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 6);

        assert_eq!(service.session_date(start, 1, 7), start);
        assert_eq!(
            service.session_date(start, 3, 7),
            NaiveDate::from_ymd_opt(2025, 1, 20)
        );
        assert_eq!(
            service.session_date(start, 2, 0),
            start
        );
        assert_eq!(service.session_date(None, 2, 7), None);
    }
}
