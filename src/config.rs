use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::AdvisorError;
use crate::recommend::{
    RecommendationLimits, MAX_ELECTIVE_RECOMMENDATIONS, MAX_REQUIRED_RECOMMENDATIONS,
};

pub const DEFAULT_CURRICULUM: &str = "Computer Science BS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub database_url: Option<String>,
    pub curriculum: String,
    pub limits: RecommendationLimits,
}

impl AdvisorConfig {
    pub fn load() -> Result<Self, AdvisorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdvisorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let curriculum = try_load(
            &lookup,
            "ADVISOR_CURRICULUM",
            DEFAULT_CURRICULUM.to_string(),
        )?;
        let max_required = try_load(
            &lookup,
            "ADVISOR_MAX_REQUIRED",
            MAX_REQUIRED_RECOMMENDATIONS,
        )?;
        let max_electives = try_load(
            &lookup,
            "ADVISOR_MAX_ELECTIVES",
            MAX_ELECTIVE_RECOMMENDATIONS,
        )?;

        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            curriculum,
            limits: RecommendationLimits {
                max_required,
                max_electives,
            },
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AdvisorError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
{
    let Some(value) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    value.trim().parse().map_err(|_| AdvisorError::InvalidConfig {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_advising_policy() {
        let config = AdvisorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.curriculum, "Computer Science BS");
        assert_eq!(config.limits.max_required, 5);
        assert_eq!(config.limits.max_electives, 3);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AdvisorConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/advisor"),
            ("ADVISOR_CURRICULUM", "Mathematics BA"),
            ("ADVISOR_MAX_REQUIRED", " 4 "),
            ("ADVISOR_MAX_ELECTIVES", "6"),
        ]))
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/advisor")
        );
        assert_eq!(config.curriculum, "Mathematics BA");
        assert_eq!(config.limits.max_required, 4);
        assert_eq!(config.limits.max_electives, 6);
    }

    #[test]
    fn invalid_limit_is_rejected() {
        let lookup = lookup_from(&[("ADVISOR_MAX_REQUIRED", "five")]);
        let error = AdvisorConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(
            error,
            AdvisorError::InvalidConfig { ref key, ref value }
                if key == "ADVISOR_MAX_REQUIRED" && value == "five"
        ));
    }
}
