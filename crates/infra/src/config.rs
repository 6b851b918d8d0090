//! Configuration loading and representation.
//!
//! Everything comes from environment variables; unset variables fall back to
//! defaults, malformed ones are errors.
//!
//! | variable | meaning | default |
//! |----------|---------|---------|
//! | `STOCKROOM_SEED_PATH` | JSON file to seed an empty ledger from | built-in catalog |
//! | `STOCKROOM_STORE_PATH` | JSON document the ledger persists to | in-memory |
//! | `STOCKROOM_RECENT_LIMIT` | movements shown on the dashboard | `10` |
//! | `STOCKROOM_LOG_FORMAT` | `json` or `pretty` | `json` |

use std::path::PathBuf;

use thiserror::Error;

use stockroom_observability::LogFormat;

pub const SEED_PATH_VAR: &str = "STOCKROOM_SEED_PATH";
pub const STORE_PATH_VAR: &str = "STOCKROOM_STORE_PATH";
pub const RECENT_LIMIT_VAR: &str = "STOCKROOM_RECENT_LIMIT";
pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";

/// Number of recent movements the dashboard lists.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidLimit { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidLogFormat { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub seed_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub recent_limit: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            store_path: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let recent_limit = match non_empty(RECENT_LIMIT_VAR) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidLimit {
                        var: RECENT_LIMIT_VAR,
                        value,
                    });
                }
            },
            None => DEFAULT_RECENT_LIMIT,
        };

        let log_format = match non_empty(LOG_FORMAT_VAR) {
            Some(value) => value.parse::<LogFormat>().map_err(|e| {
                ConfigError::InvalidLogFormat {
                    var: LOG_FORMAT_VAR,
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let store_path = non_empty(STORE_PATH_VAR).map(PathBuf::from);
        if store_path.is_none() {
            tracing::warn!("{STORE_PATH_VAR} not set; ledger changes will not outlive the process");
        }

        Ok(Self {
            seed_path: non_empty(SEED_PATH_VAR).map(PathBuf::from),
            store_path,
            recent_limit,
            log_format,
        })
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.recent_limit, 10);
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (SEED_PATH_VAR, "/srv/seed.json"),
            (STORE_PATH_VAR, "/var/lib/stockroom/ledger.json"),
            (RECENT_LIMIT_VAR, "25"),
            (LOG_FORMAT_VAR, "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.seed_path, Some(PathBuf::from("/srv/seed.json")));
        assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/stockroom/ledger.json")));
        assert_eq!(config.recent_limit, 25);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[(STORE_PATH_VAR, "  ")])).unwrap();
        assert_eq!(config.store_path, None);
    }

    #[test]
    fn malformed_values_are_errors() {
        for bad in ["0", "ten", "-1"] {
            let err = AppConfig::from_lookup(lookup(&[(RECENT_LIMIT_VAR, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidLimit { .. }));
        }

        let err = AppConfig::from_lookup(lookup(&[(LOG_FORMAT_VAR, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogFormat { .. }));
    }
}
