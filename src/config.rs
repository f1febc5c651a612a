use league_core::{ScoringRules, SeriesBasis};
use thiserror::Error;

const DEFAULT_DAYS_BETWEEN_SESSIONS: u32 = 7;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub scoring_rules: ScoringRules,
    pub days_between_sessions: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LEAGUE_SERIES_POINT_BASIS: {0}")]
    SeriesBasis(String),
    #[error("LEAGUE_DAYS_BETWEEN_SESSIONS must be a non-negative integer, got {0:?}")]
    DaysBetweenSessions(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let series_basis = match lookup("LEAGUE_SERIES_POINT_BASIS") {
            Some(value) => value.parse::<SeriesBasis>().map_err(ConfigError::SeriesBasis)?,
            None => SeriesBasis::default(),
        };
        let days_between_sessions = match lookup("LEAGUE_DAYS_BETWEEN_SESSIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::DaysBetweenSessions(value))?,
            None => DEFAULT_DAYS_BETWEEN_SESSIONS,
        };
        Ok(Self {
            scoring_rules: ScoringRules { series_basis },
            days_between_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.scoring_rules.series_basis, SeriesBasis::Handicap);
        assert_eq!(config.days_between_sessions, 7);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("LEAGUE_SERIES_POINT_BASIS", "Scratch"),
            ("LEAGUE_DAYS_BETWEEN_SESSIONS", "14"),
        ])
        .unwrap();
        assert_eq!(config.scoring_rules.series_basis, SeriesBasis::Scratch);
        assert_eq!(config.days_between_sessions, 14);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config(&[("LEAGUE_SERIES_POINT_BASIS", "pins")]),
            Err(ConfigError::SeriesBasis(_))
        ));
        assert!(matches!(
            config(&[("LEAGUE_DAYS_BETWEEN_SESSIONS", "-1")]),
            Err(ConfigError::DaysBetweenSessions(_))
        ));
    }
}
