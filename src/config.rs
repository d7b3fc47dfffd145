//! Application-level configuration loading: room limit and rule-violation policy.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUORIDOR_BACK_CONFIG_PATH";
/// Rooms the registry holds before `createRoom` is refused.
const DEFAULT_MAX_ROOMS: usize = 1024;

/// What happens to a move or wall intent that breaks the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionPolicy {
    /// Drop the intent without telling anyone.
    #[default]
    Silent,
    /// Drop the intent and unicast an `error` event to the sender.
    Report,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    max_rooms: usize,
    rule_violations: RejectionPolicy,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        max_rooms = app_config.max_rooms,
                        policy = ?app_config.rule_violations,
                        "loaded configuration"
                    );
                    app_config
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

    /// Maximum number of rooms alive at once.
    pub fn max_rooms(&self) -> usize {
        self.max_rooms
    }

    /// How rule violations are answered.
    pub fn rule_violations(&self) -> RejectionPolicy {
        self.rule_violations
    }

    /// Override the rule-violation policy.
    pub fn with_rule_violations(mut self, policy: RejectionPolicy) -> Self {
        self.rule_violations = policy;
        self
    }

    /// Override the room limit.
    pub fn with_max_rooms(mut self, max_rooms: usize) -> Self {
        self.max_rooms = max_rooms;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_rooms: DEFAULT_MAX_ROOMS,
            rule_violations: RejectionPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    max_rooms: Option<usize>,
    rule_violations: Option<RejectionPolicy>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_rooms: value
                .max_rooms
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.max_rooms),
            rule_violations: value.rule_violations.unwrap_or(defaults.rule_violations),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
