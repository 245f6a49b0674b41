//! Client configuration.
//!
//! Values are layered: built-in defaults, then `<config_dir>/dash-chat/config.json`,
//! then `DASH_CHAT_URL` / `DASH_CHAT_TIMEOUT_SECS`, then CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_NAME: &str = "dash-chat";
const CONFIG_FILE: &str = "config.json";

pub const URL_ENV: &str = "DASH_CHAT_URL";
pub const TIMEOUT_ENV: &str = "DASH_CHAT_TIMEOUT_SECS";

pub const DEFAULT_GREETING: &str =
    "Hello! Welcome to Hair Dash. I am the bot. How can I assist you today?";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Invalid config file {path}: timeout_secs must be at least 1")]
    ZeroTimeout { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server root, e.g. `http://localhost:3000`
    pub base_url: String,
    pub upload_path: String,
    pub chat_path: String,
    /// First bot message of every session
    pub greeting: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            upload_path: "/api/upload".to_string(),
            chat_path: "/chat".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the user's config directory and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    /// Load a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(URL_ENV) {
            self.base_url = url;
        }
        if let Some(value) = lookup(TIMEOUT_ENV) {
            let parsed: Result<u64, _> = value.trim().parse();
            match parsed {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: TIMEOUT_ENV,
                        value,
                    })
                }
            }
        }
        Ok(self)
    }
}

/// `<config_dir>/dash-chat/config.json`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"base_url": "http://10.0.0.2:8080", "greeting": "Hi"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.greeting, "Hi");
        assert_eq!(config.chat_path, "/chat");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env(env(&[(URL_ENV, "http://remote"), (TIMEOUT_ENV, " 5 ")]))
            .unwrap();
        assert_eq!(config.base_url, "http://remote");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_bad_timeout_env() {
        let err = Config::default()
            .with_env(env(&[(TIMEOUT_ENV, "soon")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DASH_CHAT_TIMEOUT_SECS: soon");
    }

    #[test]
    fn test_zero_timeout_env_is_rejected() {
        let err = Config::default()
            .with_env(env(&[(TIMEOUT_ENV, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: TIMEOUT_ENV, .. }));
    }

    #[test]
    fn test_zero_timeout_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"timeout_secs": 0}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout { .. }));
    }
}
