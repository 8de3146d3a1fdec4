//! Application-level configuration loading: match timing, scheduler cadence and static assets.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration as StdDuration};

use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use crate::state::lifecycle::MatchTiming;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TIPPING_BACK_CONFIG_PATH";

const DEFAULT_PLAY_MINUTES: u32 = 10;
const DEFAULT_STOPPAGE_MINUTES: u32 = 10;
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60;
const DEFAULT_READ_DEBOUNCE_MS: u64 = 1_000;
const DEFAULT_PUBLIC_DIR: &str = "public";
/// Upper bound for each of the play and stoppage durations.
const MAX_PERIOD_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Durations deciding when a live match is over.
    pub timing: MatchTiming,
    /// Period of the background reconciliation task.
    pub reconcile_interval: StdDuration,
    /// Minimum spacing between two read-triggered reconciliation passes.
    pub read_debounce: Duration,
    /// Directory served for every path not claimed by the API.
    pub public_dir: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        play = %config.timing.play,
                        stoppage = %config.timing.stoppage,
                        interval_secs = config.reconcile_interval.as_secs(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document. Missing keys take their default value.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    play_minutes: u32,
    stoppage_minutes: u32,
    reconcile_interval_secs: u64,
    read_debounce_ms: u64,
    public_dir: PathBuf,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            play_minutes: DEFAULT_PLAY_MINUTES,
            stoppage_minutes: DEFAULT_STOPPAGE_MINUTES,
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
            read_debounce_ms: DEFAULT_READ_DEBOUNCE_MS,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            timing: MatchTiming {
                play: period_minutes(value.play_minutes),
                stoppage: period_minutes(value.stoppage_minutes),
            },
            // A zero period would make the ticker spin.
            reconcile_interval: StdDuration::from_secs(value.reconcile_interval_secs.max(1)),
            read_debounce: Duration::milliseconds(
                i64::try_from(value.read_debounce_ms).unwrap_or(i64::MAX),
            ),
            public_dir: value.public_dir,
        }
    }
}

fn period_minutes(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes.min(MAX_PERIOD_MINUTES)))
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_single_pitch_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.timing.play, Duration::minutes(10));
        assert_eq!(config.timing.stoppage, Duration::minutes(10));
        assert_eq!(config.reconcile_interval, StdDuration::from_secs(60));
        assert_eq!(config.read_debounce, Duration::seconds(1));
        assert_eq!(config.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AppConfig::from_json(r#"{ "play_minutes": 90, "stoppage_minutes": 5 }"#)
            .expect("valid config");
        assert_eq!(config.timing.play, Duration::minutes(90));
        assert_eq!(config.timing.stoppage, Duration::minutes(5));
        assert_eq!(config.reconcile_interval, StdDuration::from_secs(60));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config =
            AppConfig::from_json(r#"{ "reconcile_interval_secs": 0 }"#).expect("valid config");
        assert_eq!(config.reconcile_interval, StdDuration::from_secs(1));
    }

    #[test]
    fn oversized_periods_are_capped() {
        let config = AppConfig::from_json(
            r#"{ "play_minutes": 4294967295, "stoppage_minutes": 4294967295 }"#,
        )
        .expect("valid config");
        assert_eq!(config.timing.play, Duration::minutes(1_440));
        assert_eq!(config.timing.stoppage, Duration::minutes(1_440));

        let now = time::macros::datetime!(2026-05-09 15:00 UTC);
        let [_, finish] = config.timing.steps(now);
        assert_eq!(finish.kicked_off_by, now - Duration::days(2));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_json(r#"{ "spielzeit": 10 }"#).is_err());
    }
}
