//! Runtime configuration
//!
//! Defaults can be overridden through environment variables:
//!
//! - `MEDIA_REDUX_SOURCE`: source URI handed to the player
//! - `MEDIA_REDUX_TICK_MS`: progress polling period while playing
//! - `MEDIA_REDUX_STOP_GRACE_SECS`: how long a permanent focus loss may last before stopping
//! - `MEDIA_REDUX_TRACK_SECS`: length of the simulated track
//! - `MEDIA_REDUX_DENY_FOCUS`: make the simulated system deny focus requests

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_SOURCE: &str = "https://edge1.pod.npr.org/anon.npr-mp3/npr/newscasts/newscast.mp3";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(30);

const DEFAULT_TRACK_LENGTH: Duration = Duration::from_secs(5 * 60);
const DEFAULT_PREPARE_LATENCY: Duration = Duration::from_millis(400);

/// Settings of the playback session itself
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub source: String,
    pub tick_interval: Duration,
    pub stop_grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }
}

/// Settings of the simulated platform backing the demo
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub track_length: Duration,
    pub prepare_latency: Duration,
    pub grant_focus: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            track_length: DEFAULT_TRACK_LENGTH,
            prepare_latency: DEFAULT_PREPARE_LATENCY,
            grant_focus: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(source) = lookup("MEDIA_REDUX_SOURCE") {
            config.session.source = source;
        }
        if let Some(ms) = parse::<u64>(&lookup, "MEDIA_REDUX_TICK_MS")? {
            anyhow::ensure!(ms > 0, "MEDIA_REDUX_TICK_MS must be positive");
            config.session.tick_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse::<u64>(&lookup, "MEDIA_REDUX_STOP_GRACE_SECS")? {
            config.session.stop_grace = Duration::from_secs(secs);
        }
        if let Some(secs) = parse::<u64>(&lookup, "MEDIA_REDUX_TRACK_SECS")? {
            config.simulation.track_length = Duration::from_secs(secs);
        }
        if let Some(deny) = parse::<bool>(&lookup, "MEDIA_REDUX_DENY_FOCUS")? {
            config.simulation.grant_focus = !deny;
        }

        Ok(config)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value {raw:?} for {key}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.session.stop_grace, Duration::from_secs(30));
        assert_eq!(config.session.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MEDIA_REDUX_SOURCE", "file:///tmp/song.mp3"),
            ("MEDIA_REDUX_TICK_MS", "250"),
            ("MEDIA_REDUX_STOP_GRACE_SECS", "5"),
            ("MEDIA_REDUX_DENY_FOCUS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.session.source, "file:///tmp/song.mp3");
        assert_eq!(config.session.tick_interval, Duration::from_millis(250));
        assert_eq!(config.session.stop_grace, Duration::from_secs(5));
        assert!(!config.simulation.grant_focus);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[("MEDIA_REDUX_TRACK_SECS", "soon")])).unwrap_err();

        assert!(err.to_string().contains("MEDIA_REDUX_TRACK_SECS"));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("MEDIA_REDUX_TICK_MS", "0")])).is_err());
    }
}
