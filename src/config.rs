//! Application-level configuration loading, including the match format and default rosters.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::state::{cricket::TeamRoster, scoring::MatchRules};

const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Overrides [`DEFAULT_CONFIG_PATH`] when set and non-empty.
const CONFIG_PATH_ENV: &str = "CRICKET_SCOREBOARD_CONFIG_PATH";
const DEFAULT_OVER_LIMIT: u32 = 20;
const DEFAULT_TOKEN_TTL_HOURS: u64 = 5;

#[derive(Debug, Error)]
enum ConfigFileError {
    #[error("cannot read file")]
    Read(#[source] io::Error),
    #[error("invalid JSON")]
    Parse(#[source] serde_json::Error),
}

/// Match format, token lifetime and the rosters of the two sides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    over_limit: u32,
    token_ttl: Duration,
    rosters: [TeamRoster; 2],
}

impl AppConfig {
    /// Read the configuration file. A missing or broken file yields the defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match read_config_file(&path) {
            Ok(Some(raw)) => Self::from(raw),
            Ok(None) => {
                info!(path = %path.display(), "no configuration file; using built-in rosters");
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    detail = ?err,
                    "ignoring configuration file"
                );
                Self::default()
            }
        };

        info!(
            over_limit = config.over_limit,
            team_a = %config.rosters[0].name,
            team_b = %config.rosters[1].name,
            "match configuration ready"
        );
        config
    }

    /// Lifetime of issued bearer tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Rosters used when a fresh match is bootstrapped (team A first).
    pub(crate) fn rosters(&self) -> &[TeamRoster; 2] {
        &self.rosters
    }

    pub(crate) fn match_rules(&self) -> MatchRules {
        MatchRules {
            over_limit: self.over_limit,
        }
    }

    /// Copy of this configuration with a different over limit (zero is ignored).
    #[cfg(test)]
    pub fn with_over_limit(mut self, over_limit: u32) -> Self {
        if over_limit > 0 {
            self.over_limit = over_limit;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            over_limit: DEFAULT_OVER_LIMIT,
            token_ttl: hours(DEFAULT_TOKEN_TTL_HOURS),
            rosters: default_rosters(),
        }
    }
}

/// On-disk shape of the configuration; every key is optional.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    over_limit: Option<u32>,
    #[serde(default)]
    token_ttl_hours: Option<u64>,
    #[serde(default)]
    teams: Option<[RawRoster; 2]>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let over_limit = positive_or_default("over_limit", value.over_limit, DEFAULT_OVER_LIMIT);
        let ttl_hours = positive_or_default(
            "token_ttl_hours",
            value.token_ttl_hours,
            DEFAULT_TOKEN_TTL_HOURS,
        );
        let rosters = match value.teams {
            Some([a, b]) => [a.into(), b.into()],
            None => default_rosters(),
        };

        Self {
            over_limit,
            token_ttl: hours(ttl_hours),
            rosters,
        }
    }
}

fn positive_or_default<T>(key: &'static str, value: Option<T>, default: T) -> T
where
    T: Copy + Default + PartialEq + std::fmt::Display,
{
    match value {
        Some(zero) if zero == T::default() => {
            warn!(key, %default, "configuration value must be positive; using default");
            default
        }
        Some(value) => value,
        None => default,
    }
}

#[derive(Debug, Deserialize)]
struct RawRoster {
    name: String,
    striker: String,
    non_striker: String,
    bowler: String,
    non_bowler: String,
}

impl From<RawRoster> for TeamRoster {
    fn from(value: RawRoster) -> Self {
        Self {
            name: value.name,
            striker: value.striker,
            non_striker: value.non_striker,
            bowler: value.bowler,
            non_bowler: value.non_bowler,
        }
    }
}

fn hours(count: u64) -> Duration {
    Duration::from_secs(count * 60 * 60)
}

fn resolve_config_path() -> PathBuf {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// `Ok(None)` when the file does not exist.
fn read_config_file(path: &Path) -> Result<Option<RawConfig>, ConfigFileError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigFileError::Read(err)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(ConfigFileError::Parse)
}

/// Placeholder rosters shipped with the binary.
fn default_rosters() -> [TeamRoster; 2] {
    [
        TeamRoster {
            name: "Team A".into(),
            striker: "Batter A1".into(),
            non_striker: "Batter A2".into(),
            bowler: "Bowler A1".into(),
            non_bowler: "Bowler A2".into(),
        },
        TeamRoster {
            name: "Team B".into(),
            striker: "Batter B1".into(),
            non_striker: "Batter B2".into(),
            bowler: "Bowler B1".into(),
            non_bowler: "Bowler B2".into(),
        },
    ]
}
