use log::{LevelFilter, warn};
use std::str::FromStr;
use std::time::Duration;

const REFRESH_SECS_VAR: &str = "SCORELINE_REFRESH_SECS";
const TIMEOUT_SECS_VAR: &str = "SCORELINE_TIMEOUT_SECS";
const LOG_LEVEL_VAR: &str = "SCORELINE_LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub refresh_every: Duration,
    pub request_timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            refresh_every: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            full_screen: false,
            log_level: lookup(LOG_LEVEL_VAR).and_then(|v| parse_var(LOG_LEVEL_VAR, &v)),
            refresh_every: lookup(REFRESH_SECS_VAR)
                .and_then(|v| parse_secs(REFRESH_SECS_VAR, &v))
                .unwrap_or(defaults.refresh_every),
            request_timeout: lookup(TIMEOUT_SECS_VAR)
                .and_then(|v| parse_secs(TIMEOUT_SECS_VAR, &v))
                .unwrap_or(defaults.request_timeout),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        warn!("ignoring {key}={value:?}");
    }
    parsed
}

fn parse_secs(key: &str, value: &str) -> Option<Duration> {
    parse_var::<u64>(key, value)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
