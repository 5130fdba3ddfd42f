use std::env;
use std::time::Duration;

use tracing::warn;

use crate::models::TierSet;

pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings read from the environment. CLI flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tier_set: TierSet,
    pub refresh_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tier_set: TierSet::A,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
        }
    }
}

/// Log filter from `ACADEMIA_LOG_LEVEL`. Read before the subscriber exists,
/// so it cannot log its own fallback.
pub fn log_level() -> String {
    log_level_from(|key| env::var(key).ok())
}

fn log_level_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("ACADEMIA_LOG_LEVEL")
        .map(|raw| raw.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup("ACADEMIA_TIER_SET") {
            match raw.parse::<TierSet>() {
                Ok(tier_set) => settings.tier_set = tier_set,
                Err(err) => warn!(%err, "ignoring ACADEMIA_TIER_SET"),
            }
        }

        if let Some(raw) = lookup("ACADEMIA_REFRESH_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.refresh_interval = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring ACADEMIA_REFRESH_SECS, expected a positive integer"),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
        assert_eq!(log_level_from(lookup(&[])), "info");
    }

    #[test]
    fn reads_overrides() {
        let env = lookup(&[
            ("ACADEMIA_TIER_SET", "B"),
            ("ACADEMIA_REFRESH_SECS", "5"),
            ("ACADEMIA_LOG_LEVEL", " debug "),
        ]);
        let settings = Settings::from_lookup(&env);
        assert_eq!(settings.tier_set, TierSet::B);
        assert_eq!(settings.refresh_interval, Duration::from_secs(5));
        assert_eq!(log_level_from(&env), "debug");
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let env = lookup(&[
            ("ACADEMIA_TIER_SET", "z"),
            ("ACADEMIA_REFRESH_SECS", "0"),
            ("ACADEMIA_LOG_LEVEL", "  "),
        ]);
        assert_eq!(Settings::from_lookup(&env), Settings::default());
        assert_eq!(log_level_from(&env), "info");
    }
}
